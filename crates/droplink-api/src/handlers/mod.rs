pub mod code_generate;
pub mod code_join;
pub mod device_info;
pub mod file_list;
pub mod file_upload;
