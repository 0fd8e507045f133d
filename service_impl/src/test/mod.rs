#[cfg(test)]
pub mod service_offering;
