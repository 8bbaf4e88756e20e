//! Registries for read-only resources and prompt templates.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::{GetPromptResult, Prompt, ReadResourceResult, Resource, ResourceContent};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub trait ResourceHandler: Send + Sync {
    fn definition(&self) -> Resource;
    fn read(&self) -> ProtocolResult<ResourceContent>;
}

pub trait PromptHandler: Send + Sync {
    fn definition(&self) -> Prompt;
    fn render(&self, arguments: &HashMap<String, String>) -> ProtocolResult<GetPromptResult>;
}

pub struct ResourceRegistry {
    resources: DashMap<String, Arc<dyn ResourceHandler>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
        }
    }

    pub fn register<T: ResourceHandler + 'static>(&self, resource: T) {
        let uri = resource.definition().uri;
        debug!("Registering resource: {}", uri);
        self.resources.insert(uri, Arc::new(resource));
    }

    pub fn get(&self, uri: &str) -> Option<Arc<dyn ResourceHandler>> {
        self.resources.get(uri).map(|r| Arc::clone(&*r))
    }

    /// Definitions sorted by URI.
    pub fn list(&self) -> Vec<Resource> {
        let mut resources: Vec<_> = self.resources.iter().map(|r| r.value().definition()).collect();
        resources.sort_by(|a, b| a.uri.cmp(&b.uri));
        resources
    }

    pub fn read(&self, uri: &str) -> ProtocolResult<ReadResourceResult> {
        let resource = self
            .get(uri)
            .ok_or_else(|| ProtocolError::ResourceNotFound(uri.to_string()))?;
        Ok(ReadResourceResult {
            contents: vec![resource.read()?],
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PromptRegistry {
    prompts: DashMap<String, Arc<dyn PromptHandler>>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self {
            prompts: DashMap::new(),
        }
    }

    pub fn register<T: PromptHandler + 'static>(&self, prompt: T) {
        let name = prompt.definition().name;
        debug!("Registering prompt: {}", name);
        self.prompts.insert(name, Arc::new(prompt));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PromptHandler>> {
        self.prompts.get(name).map(|r| Arc::clone(&*r))
    }

    /// Definitions sorted by name.
    pub fn list(&self) -> Vec<Prompt> {
        let mut prompts: Vec<_> = self.prompts.iter().map(|r| r.value().definition()).collect();
        prompts.sort_by(|a, b| a.name.cmp(&b.name));
        prompts
    }

    pub fn render(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
    ) -> ProtocolResult<GetPromptResult> {
        let prompt = self
            .get(name)
            .ok_or_else(|| ProtocolError::PromptNotFound(name.to_string()))?;
        prompt.render(arguments)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Content, PromptMessage, Role};

    struct StaticResource;

    impl ResourceHandler for StaticResource {
        fn definition(&self) -> Resource {
            Resource {
                uri: "test://static".into(),
                name: "Static".into(),
                description: None,
                mime_type: Some("text/plain".into()),
            }
        }

        fn read(&self) -> ProtocolResult<ResourceContent> {
            Ok(ResourceContent {
                uri: "test://static".into(),
                mime_type: Some("text/plain".into()),
                text: Some("hello".into()),
                blob: None,
            })
        }
    }

    struct EchoPrompt;

    impl PromptHandler for EchoPrompt {
        fn definition(&self) -> Prompt {
            Prompt {
                name: "echo".into(),
                description: None,
                arguments: None,
            }
        }

        fn render(&self, arguments: &HashMap<String, String>) -> ProtocolResult<GetPromptResult> {
            let text = arguments.get("text").cloned().unwrap_or_default();
            Ok(GetPromptResult {
                description: None,
                messages: vec![PromptMessage {
                    role: Role::User,
                    content: Content::text(text),
                }],
            })
        }
    }

    #[test]
    fn test_resource_registry() {
        let registry = ResourceRegistry::new();
        registry.register(StaticResource);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].uri, "test://static");

        let read = registry.read("test://static").unwrap();
        assert_eq!(read.contents[0].text.as_deref(), Some("hello"));

        let err = registry.read("test://missing").unwrap_err();
        assert!(matches!(err, ProtocolError::ResourceNotFound(uri) if uri == "test://missing"));
    }

    #[test]
    fn test_prompt_registry() {
        let registry = PromptRegistry::new();
        assert!(registry.is_empty());
        registry.register(EchoPrompt);

        let args = HashMap::from([("text".to_string(), "hi".to_string())]);
        let rendered = registry.render("echo", &args).unwrap();
        assert_eq!(rendered.messages[0].content, Content::text("hi"));

        let err = registry.render("missing", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ProtocolError::PromptNotFound(name) if name == "missing"));
    }
}
