#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use dv_cfg as cfg;
pub use dv_reflect as reflect;
pub use dv_utils as utils;
