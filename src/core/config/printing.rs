use crate::core::config::data::{mask_secret, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.api_endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (default: {})", self.api_endpoint()),
        }
        match self.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => println!("  api-key: {}", mask_secret(key)),
            None => println!("  api-key: (unset)"),
        }
        match &self.selected_model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset)"),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset)"),
        }
        println!("  max-tokens: {}", self.max_tokens());
        println!("  temperature: {}", self.temperature());
        match self.markdown_enabled() {
            true => println!("  markdown: on"),
            false => println!("  markdown: off"),
        }
        let markers = self.reasoning_markers();
        println!("  reasoning-tags: {} {}", markers.open, markers.close);
    }
}
