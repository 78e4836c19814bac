use std::fmt;

/// Named views of the site, one per URL fragment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    About,
    Songs,
    Events,
    Playlists,
    AddSong,
    SundayServices,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::Signup,
        Route::About,
        Route::Songs,
        Route::Events,
        Route::Playlists,
        Route::AddSong,
        Route::SundayServices,
    ];

    pub const DEFAULT: Route = Route::Songs;

    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Signup => "signup",
            Route::About => "about",
            Route::Songs => "songs",
            Route::Events => "events",
            Route::Playlists => "playlists",
            Route::AddSong => "add-song",
            Route::SundayServices => "sunday-services",
        }
    }

    pub fn from_fragment(fragment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|route| route.fragment() == fragment)
    }

    pub fn path(&self) -> String {
        format!("/{}", self.fragment())
    }

    /// Views that show the login prompt instead of data when signed out
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Songs | Route::Playlists | Route::AddSong | Route::SundayServices
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.fragment())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The route became current. `changed` is false when it already was.
    Enter { route: Route, changed: bool },
    /// The fragment is unknown; the client has to move to `Route` instead.
    Redirect(Route),
}

/// Fragment driven state machine holding the current route
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Router {
    current: Option<Route>,
}

impl Router {
    /// The route the client is on, the default before the first navigation
    pub fn current(&self) -> Route {
        self.current.unwrap_or(Route::DEFAULT)
    }

    /// React to a fragment change. Accepts `#songs`, `songs` and `/songs`.
    pub fn navigate(&mut self, fragment: &str) -> Transition {
        let fragment = fragment.trim().trim_start_matches(['#', '/']).trim_end_matches('/');

        if fragment.is_empty() {
            return self.enter(Route::DEFAULT);
        }

        match Route::from_fragment(fragment) {
            Some(route) => self.enter(route),
            None => Transition::Redirect(Route::DEFAULT),
        }
    }

    /// Programmatic move, e.g. after signing in
    pub fn redirect(&mut self, route: Route) -> Transition {
        self.enter(route)
    }

    fn enter(&mut self, route: Route) -> Transition {
        let changed = self.current != Some(route);
        self.current = Some(route);
        Transition::Enter { route, changed }
    }
}
