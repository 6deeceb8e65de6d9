use std::collections::BTreeMap;
use std::sync::Arc;

use cms_blocks::application::block_by_identifier::BlockByIdentifier;
use cms_blocks::application::context::{RenderContext, TracingEvents};
use cms_blocks::application::filter::DirectiveFilterProvider;
use cms_blocks::config::{OutputSettings, TemplateSettings};
use cms_blocks::domain::stores::StoreId;
use cms_blocks::infra::catalog::Catalog;
use cms_blocks::infra::memory::{FixedStoreResolver, InMemoryBlocks};

const CATALOG: &str = r#"
[[stores]]
id = 0
code = "admin"

[[stores]]
id = 1
code = "default"
base_url = "https://shop.example/"

[[stores]]
id = 2
code = "nl"
base_url = "https://nl.shop.example/"

[[blocks]]
id = 10
identifier = "footer"
content = "<p>Store {{store code}} - <a href=\"{{store url='contact'}}\">Contact</a> {{var phone}}</p>"

[[blocks]]
id = 11
identifier = "footer"
content = "<p>Winkel {{store code}}</p><script>track()</script>"
stores = [2]

[[blocks]]
id = 12
identifier = "retired"
content = "<p>Old</p>"
active = false
"#;

struct Fixture {
    catalog: Catalog,
    repo: Arc<InMemoryBlocks>,
    template: TemplateSettings,
    output: OutputSettings,
}

impl Fixture {
    fn new() -> Self {
        let catalog = Catalog::from_toml_str(CATALOG).expect("valid catalog");
        let repo = Arc::new(catalog.clone().into_repository().expect("repository"));
        Self {
            catalog,
            repo,
            template: TemplateSettings {
                sanitize: true,
                variables: BTreeMap::from([("phone".to_string(), "555-0100".to_string())]),
            },
            output: OutputSettings::default(),
        }
    }

    fn block(&self, identifier: Option<&str>, store: u32) -> BlockByIdentifier {
        let store = self
            .catalog
            .store(Some(StoreId::new(store)))
            .expect("known store");
        BlockByIdentifier::new(
            self.repo.clone(),
            Arc::new(FixedStoreResolver::new(store)),
            Arc::new(DirectiveFilterProvider::from(&self.template)),
            RenderContext::new(Arc::new(TracingEvents), Arc::new(self.output.clone())),
            identifier.map(str::to_string),
        )
    }
}

#[tokio::test]
async fn renders_all_stores_block_with_directives() {
    let fixture = Fixture::new();
    let block = fixture.block(Some("footer"), 1);

    let html = block.render().await.expect("render");
    assert!(html.starts_with("<p>Store default - <a href=\"https://shop.example/contact\""));
    assert!(html.contains(">Contact</a> 555-0100</p>"));
    assert_eq!(
        block.identities().await,
        vec![
            "CMS_BLOCK_footer".to_string(),
            "CMS_BLOCK_footer_1".to_string(),
            "CMS_BLOCK_10".to_string(),
        ]
    );
}

#[tokio::test]
async fn store_specific_block_is_sanitized_and_tagged() {
    let fixture = Fixture::new();
    let block = fixture.block(Some("footer"), 2);

    assert_eq!(
        block.render().await.expect("render"),
        "<p>Winkel nl</p>"
    );
    assert_eq!(
        block.identities().await,
        vec![
            "CMS_BLOCK_footer".to_string(),
            "CMS_BLOCK_footer_2".to_string(),
            "CMS_BLOCK_11".to_string(),
        ]
    );
}

#[tokio::test]
async fn inactive_block_renders_nothing() {
    let fixture = Fixture::new();
    let block = fixture.block(Some("retired"), 1);

    assert_eq!(block.render().await.expect("render"), "");
    assert_eq!(
        block.identities().await,
        vec![
            "CMS_BLOCK_retired".to_string(),
            "CMS_BLOCK_retired_1".to_string(),
        ]
    );
}

#[tokio::test]
async fn missing_identifier_renders_nothing() {
    let fixture = Fixture::new();
    let block = fixture.block(None, 1);

    assert_eq!(block.render().await.expect("render"), "");
    assert!(block.identities().await.is_empty());
}

#[tokio::test]
async fn disabled_store_output_renders_nothing() {
    let mut fixture = Fixture::new();
    fixture.output.disabled_stores = vec![StoreId::new(2)];

    assert_eq!(
        fixture
            .block(Some("footer"), 2)
            .render()
            .await
            .expect("render"),
        ""
    );
    assert_ne!(
        fixture
            .block(Some("footer"), 1)
            .render()
            .await
            .expect("render"),
        ""
    );
}

#[tokio::test]
async fn removed_block_falls_back_to_all_stores_block() {
    let fixture = Fixture::new();
    fixture.repo.remove(11).expect("store-specific block present");

    let block = fixture.block(Some("footer"), 2);
    let identities = block.identities().await;

    assert!(identities.contains(&"CMS_BLOCK_10".to_string()));
    assert!(identities.contains(&"CMS_BLOCK_footer_2".to_string()));
}
