#![allow(dead_code)]

pub mod scratch;
