mod common;
mod eliminators;
mod fail;
mod pass;
mod properties;
mod scenarios;
