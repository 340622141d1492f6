mod company_repository;
mod country_cache;
mod country_lookup;
mod payload_validator;

pub use company_repository::{CompanyRepository, RepositoryError};
pub use country_cache::{CacheError, CountryCache};
pub use country_lookup::{CountryLookup, LookupError};
pub use payload_validator::{FieldError, PayloadValidator};
