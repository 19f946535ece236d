mod common;

mod queries;
mod routing;
