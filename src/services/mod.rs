pub mod account_service;
pub mod tenant_service;
pub mod visit_service;

#[cfg(test)]
pub mod test_support;
