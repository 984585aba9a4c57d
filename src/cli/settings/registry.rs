//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    api_key_handler, endpoint_handler, markdown_handler, model_handler, reasoning_close_handler,
    reasoning_open_handler, MaxTokensHandler, TemperatureHandler, ThemeHandler,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `reasonstream set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(endpoint_handler()));
        registry.register(Box::new(api_key_handler()));
        registry.register(Box::new(model_handler()));
        registry.register(Box::new(ThemeHandler));
        registry.register(Box::new(MaxTokensHandler));
        registry.register(Box::new(TemperatureHandler));
        registry.register(Box::new(markdown_handler()));
        registry.register(Box::new(reasoning_open_handler()));
        registry.register(Box::new(reasoning_close_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
