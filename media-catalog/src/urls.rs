//! URL construction seam.
//!
//! Routing tables live in the web layer. Records only need a way to turn
//! a route name plus keyword parameters into a URL string, so that is the
//! whole contract here. Tests and embedders pass a closure.

/// Route name for a media entry's public page. Parameters: `user`, `media`.
pub const MEDIA_HOME: &str = "media.home";

/// Route name for a user's public profile page. Parameter: `user`.
pub const USER_HOME: &str = "user.home";

/// Maps a route name and keyword parameters to a URL.
pub trait UrlGenerator {
    fn generate(&self, route: &str, params: &[(&str, &str)]) -> String;
}

/// Any closure with the right shape works as a generator.
impl<F> UrlGenerator for F
where
    F: Fn(&str, &[(&str, &str)]) -> String,
{
    fn generate(&self, route: &str, params: &[(&str, &str)]) -> String {
        self(route, params)
    }
}
