use std::fmt;

/// The closed set of collections the API is allowed to touch.
///
/// Every generic route resolves its `:name` path parameter through
/// [`Collection::from_name`] before anything else runs; unknown names never
/// reach the store. The set is fixed at compile time on purpose - it is the
/// only authorization layer this service has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Vehicles,
    Services,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Vehicles, Collection::Services];

    /// The allow-list gate. Returns `None` for any name outside the set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "users" => Some(Collection::Users),
            "vehicles" => Some(Collection::Vehicles),
            "services" => Some(Collection::Services),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Vehicles => "vehicles",
            Collection::Services => "services",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
