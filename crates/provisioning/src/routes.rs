use models::Route;

/// Returns whether `name` is referenced as the receiver of `route` or of
/// any route beneath it. Used to veto deletion of a receiver group which
/// the routing tree still addresses.
pub fn receiver_in_use(name: &str, route: &Route) -> bool {
    route.receiver == name || route.routes.iter().any(|child| receiver_in_use(name, child))
}
