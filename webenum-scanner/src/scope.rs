use crate::endpoint::Endpoint;
use crate::options::ScanOptions;
use crate::registry::RunContext;

/// How a candidate relates to the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    SameOrigin,
    Subdomain,
    Outside,
}

/// Pure classification. Port policy is checked before the host so that a
/// same-host, wrong-port candidate is rejected even when subdomains are
/// allowed.
pub fn classify(candidate: &Endpoint, origin: &Endpoint, options: &ScanOptions) -> Scope {
    if !options.allow_other_ports && candidate.port() != origin.port() {
        return Scope::Outside;
    }
    if candidate.host() == origin.host() {
        Scope::SameOrigin
    } else if options.allow_subdomains && candidate.host().contains(origin.host()) {
        Scope::Subdomain
    } else {
        Scope::Outside
    }
}

/// Decide whether `candidate` may be explored, registering its host as a
/// discovered domain when it is an allowed subdomain.
pub fn in_scope(
    candidate: &Endpoint,
    origin: &Endpoint,
    options: &ScanOptions,
    ctx: &RunContext,
) -> bool {
    match classify(candidate, origin, options) {
        Scope::SameOrigin => true,
        Scope::Subdomain => {
            ctx.register_domain(candidate.host());
            true
        }
        Scope::Outside => false,
    }
}
