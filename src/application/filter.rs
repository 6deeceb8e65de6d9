//! Template filters applied to block content before it is emitted.

use std::collections::BTreeMap;
use std::sync::Arc;

use ammonia::Builder as AmmoniaBuilder;

use crate::domain::stores::StoreRecord;

const DIRECTIVE_OPEN: &str = "{{";
const DIRECTIVE_CLOSE: &str = "}}";

/// A filter configured for one store.
pub trait ContentFilter: Send + Sync {
    fn filter(&self, content: &str) -> String;
}

/// Hands out block filters bound to the store being rendered.
pub trait FilterProvider: Send + Sync {
    fn block_filter(&self, store: &StoreRecord) -> Box<dyn ContentFilter>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFilter;

impl ContentFilter for PassthroughFilter {
    fn filter(&self, content: &str) -> String {
        content.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFilterProvider;

impl FilterProvider for PassthroughFilterProvider {
    fn block_filter(&self, _store: &StoreRecord) -> Box<dyn ContentFilter> {
        Box::new(PassthroughFilter)
    }
}

/// Expands `{{store ...}}` and `{{var ...}}` directives, optionally sanitizing the result.
#[derive(Clone, Default)]
pub struct DirectiveFilterProvider {
    variables: Arc<BTreeMap<String, String>>,
    sanitizer: Option<Arc<AmmoniaBuilder<'static>>>,
}

impl DirectiveFilterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.variables = Arc::new(variables);
        self
    }

    pub fn with_sanitizer(mut self) -> Self {
        self.sanitizer = Some(Arc::new(build_block_sanitizer()));
        self
    }
}

impl FilterProvider for DirectiveFilterProvider {
    fn block_filter(&self, store: &StoreRecord) -> Box<dyn ContentFilter> {
        Box::new(DirectiveFilter {
            store: store.clone(),
            variables: Arc::clone(&self.variables),
            sanitizer: self.sanitizer.clone(),
        })
    }
}

pub struct DirectiveFilter {
    store: StoreRecord,
    variables: Arc<BTreeMap<String, String>>,
    sanitizer: Option<Arc<AmmoniaBuilder<'static>>>,
}

impl ContentFilter for DirectiveFilter {
    fn filter(&self, content: &str) -> String {
        let expanded = self.expand(content);
        match self.sanitizer.as_ref() {
            Some(sanitizer) => sanitizer.clean(&expanded).to_string(),
            None => expanded,
        }
    }
}

impl DirectiveFilter {
    fn expand(&self, content: &str) -> String {
        let mut output = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find(DIRECTIVE_OPEN) {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + DIRECTIVE_OPEN.len()..];
            let Some(end) = after_open.find(DIRECTIVE_CLOSE) else {
                // Unterminated: keep the remainder verbatim.
                output.push_str(&rest[start..]);
                return output;
            };

            let body = &after_open[..end];
            match self.resolve(body) {
                Some(value) => output.push_str(&value),
                None => {
                    output.push_str(DIRECTIVE_OPEN);
                    output.push_str(body);
                    output.push_str(DIRECTIVE_CLOSE);
                }
            }
            rest = &after_open[end + DIRECTIVE_CLOSE.len()..];
        }

        output.push_str(rest);
        output
    }

    fn resolve(&self, body: &str) -> Option<String> {
        let body = body.trim();
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body, ""),
        };

        match name {
            "store" => self.resolve_store(args),
            "var" if !args.is_empty() => {
                Some(self.variables.get(args).cloned().unwrap_or_default())
            }
            _ => None,
        }
    }

    fn resolve_store(&self, args: &str) -> Option<String> {
        match args {
            "id" => Some(self.store.id.to_string()),
            "code" => Some(self.store.code.clone()),
            _ => {
                let value = args.strip_prefix("url=")?;
                let path = unquote(value)?;
                Some(self.store.url(path))
            }
        }
    }
}

fn unquote(value: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
}

fn build_block_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();
    builder.add_generic_attributes(&["class", "id"]);
    builder.add_generic_attribute_prefixes(&["data-"]);
    builder
}
