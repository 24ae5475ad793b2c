// Copyright @yucwang 2021

pub mod options;
pub mod simple;
