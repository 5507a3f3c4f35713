pub mod config;
pub mod discord;
pub mod lamp;
pub mod pipeline;
pub mod switchbot;
pub mod weather;

#[cfg(test)]
mod test_support;
