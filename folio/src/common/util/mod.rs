mod date_utils;

pub(crate) use date_utils::*;
