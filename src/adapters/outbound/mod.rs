mod ipapi_country_lookup;
mod moka_country_cache;
mod sqlite_company_repo;

pub use ipapi_country_lookup::{IpapiCountryLookup, USER_AGENT};
pub use moka_country_cache::MokaCountryCache;
pub use sqlite_company_repo::SqliteCompanyRepository;
