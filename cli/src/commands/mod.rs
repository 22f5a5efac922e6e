//! Command implementations

pub mod add;
pub mod del;
pub mod ls;
pub mod new;
pub mod rm;
pub mod show;
pub mod sync;

use clap::Args;

/// Arguments for `bdapt new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Bundle name (lowercase letters, digits, `.` and `-`)
    pub bundle: String,

    /// Packages to include, optionally with a constraint (e.g. `nginx>=1.18`)
    pub packages: Vec<String>,

    /// Bundle description
    #[arg(short, long)]
    pub desc: Option<String>,
}

/// Arguments for `bdapt add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Bundle name
    pub bundle: String,

    /// Packages to add, optionally with a constraint (e.g. `nginx>=1.18`)
    pub packages: Vec<String>,
}

/// Arguments for `bdapt rm`.
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Bundle name
    pub bundle: String,

    /// Packages to remove from the bundle
    pub packages: Vec<String>,

    /// Keep the packages installed (mark them as manually installed)
    #[arg(long)]
    pub keep_pkg: bool,

    /// Remove packages even if other bundles use them or they were installed manually
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `bdapt del`.
#[derive(Args, Debug)]
pub struct DelArgs {
    /// Bundle name
    pub bundle: String,

    /// Keep the bundle's packages installed (mark them as manually installed)
    #[arg(long)]
    pub keep_pkg: bool,

    /// Ignore shared/manual checks and drop the record even if removal fails
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `bdapt sync` and `bdapt show`.
#[derive(Args, Debug)]
pub struct BundleArg {
    /// Bundle name
    pub bundle: String,
}
