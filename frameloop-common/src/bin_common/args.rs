pub mod args_helper;
