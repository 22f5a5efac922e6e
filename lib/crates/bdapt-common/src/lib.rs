pub mod error;
pub mod model;
pub mod validate;

pub use error::ValidationError;
pub use model::{Bundle, BundleStorage, PackageSpec, UNIT_PREFIX, unit_name};
pub use validate::{
    parse_package_arg, parse_package_args, validate_bundle_name, validate_package_list,
    validate_package_name,
};
