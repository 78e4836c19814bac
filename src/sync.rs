use crate::{
    action::Action,
    model::AppState,
    render::{self, Binding},
    router::Route,
    types::AuthSession,
};
use log::trace;
use std::collections::HashMap;

/// Owns the rendered content of one client and the bindings its controls
/// declared. Bindings live exactly as long as the markup that declared them.
#[derive(Debug, Default)]
pub struct Synchronizer {
    content: String,
    bindings: HashMap<String, Action>,
    passes: u64,
}

impl Synchronizer {
    /// Re-render `route` and replace the content and all bindings
    pub fn synchronize(&mut self, route: Route, state: &AppState, session: Option<&AuthSession>) {
        let (content, bindings) = render::render(route, state, session).into_parts();

        self.content = content;
        self.unbind_all();
        for Binding { key, action } in bindings {
            self.bindings.insert(key, action);
        }
        self.passes += 1;

        trace!(
            "synchronized {route} with {} bindings (pass {})",
            self.bindings.len(),
            self.passes
        );
    }

    fn unbind_all(&mut self) {
        self.bindings.clear();
    }

    /// Look up the action of a posted control key
    pub fn resolve(&self, key: &str) -> Option<Action> {
        self.bindings.get(key).cloned()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of completed render passes
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}
