//! Resolver selection passthrough.
//!
//! After a successful login the host may resolve a display name and e-mail
//! address for the new principal. The realm never interprets these
//! strategies itself; it only carries the operator's selector string through
//! to a host-supplied registry.

use tracing::warn;

/// Selector value meaning "let the host try every registered resolver".
pub const ANY_STRATEGY: &str = "*";
/// Selector value meaning "do not resolve".
pub const NONE_STRATEGY: &str = "";

/// Which resolver strategy the host should consult.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolverSelector {
    /// Do not resolve (the empty selector).
    #[default]
    None,
    /// Try every registered resolver in registration order (`"*"`).
    Any,
    /// A single resolver, matched by its registered id.
    Named(String),
}

impl ResolverSelector {
    /// Parse the operator's selector string.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            NONE_STRATEGY => Self::None,
            ANY_STRATEGY => Self::Any,
            id => Self::Named(id.to_string()),
        }
    }

    /// Render back to the configuration string form.
    pub fn as_config_str(&self) -> &str {
        match self {
            Self::None => NONE_STRATEGY,
            Self::Any => ANY_STRATEGY,
            Self::Named(id) => id,
        }
    }
}

/// Resolves a principal's display name. Implementations are host-supplied.
pub trait NameResolver: Send + Sync {
    /// Registered id the operator can select.
    fn id(&self) -> &str;
    fn find_name_for(&self, username: &str) -> Option<String>;
}

/// Resolves a principal's e-mail address. Implementations are host-supplied.
pub trait EmailResolver: Send + Sync {
    /// Registered id the operator can select.
    fn id(&self) -> &str;
    fn find_email_for(&self, username: &str) -> Option<String>;
}

/// Host-populated set of resolver strategies.
#[derive(Default)]
pub struct ResolverRegistry {
    name_resolvers: Vec<Box<dyn NameResolver>>,
    email_resolvers: Vec<Box<dyn EmailResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_name_resolver(&mut self, resolver: Box<dyn NameResolver>) {
        self.name_resolvers.push(resolver);
    }

    pub fn register_email_resolver(&mut self, resolver: Box<dyn EmailResolver>) {
        self.email_resolvers.push(resolver);
    }

    /// Resolve a display name per the selector. Blank results count as
    /// unresolved.
    pub fn resolve_name(&self, selector: &ResolverSelector, username: &str) -> Option<String> {
        match selector {
            ResolverSelector::None => None,
            ResolverSelector::Any => self
                .name_resolvers
                .iter()
                .find_map(|r| r.find_name_for(username).filter(|n| !n.trim().is_empty())),
            ResolverSelector::Named(id) => {
                let resolver = self.name_resolvers.iter().find(|r| r.id() == id.as_str());
                if resolver.is_none() {
                    warn!(resolver = %id, "name resolver not registered; name not resolved");
                }
                resolver
                    .and_then(|r| r.find_name_for(username))
                    .filter(|n| !n.trim().is_empty())
            }
        }
    }

    /// Resolve an e-mail address per the selector. Blank results count as
    /// unresolved.
    pub fn resolve_email(&self, selector: &ResolverSelector, username: &str) -> Option<String> {
        match selector {
            ResolverSelector::None => None,
            ResolverSelector::Any => self
                .email_resolvers
                .iter()
                .find_map(|r| r.find_email_for(username).filter(|e| !e.trim().is_empty())),
            ResolverSelector::Named(id) => {
                let resolver = self.email_resolvers.iter().find(|r| r.id() == id.as_str());
                if resolver.is_none() {
                    warn!(resolver = %id, "e-mail resolver not registered; e-mail not resolved");
                }
                resolver
                    .and_then(|r| r.find_email_for(username))
                    .filter(|e| !e.trim().is_empty())
            }
        }
    }
}
