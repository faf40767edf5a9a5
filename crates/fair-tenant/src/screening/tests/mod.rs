mod common;
mod features;
mod service;
mod synthetic;
