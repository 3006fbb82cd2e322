mod concat_string;

pub mod ecmascript;
pub mod indexmap;
pub mod option_ext;
pub mod path_ext;
pub mod rstr;
pub mod sanitize_file_name;
pub mod xxhash;
