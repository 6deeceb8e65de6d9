use std::collections::HashMap;
use std::sync::Arc;

use cms_blocks::application::block_by_identifier::BlockByIdentifier;
use cms_blocks::application::context::RenderContext;
use cms_blocks::application::filter::PassthroughFilterProvider;
use cms_blocks::domain::blocks::BlockRecord;
use cms_blocks::domain::stores::{StoreId, StoreRecord};
use cms_blocks::infra::memory::{FixedStoreResolver, InMemoryBlocks};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

fn block(repo: &Arc<InMemoryBlocks>, identifier: Option<&str>) -> BlockByIdentifier {
    BlockByIdentifier::new(
        repo.clone(),
        Arc::new(FixedStoreResolver::new(StoreRecord::new(
            StoreId::new(1),
            "default",
        ))),
        Arc::new(PassthroughFilterProvider),
        RenderContext::default(),
        identifier.map(str::to_string),
    )
}

#[tokio::test]
async fn render_outcomes_are_counted_by_label() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let repo = Arc::new(InMemoryBlocks::new());
    repo.upsert(BlockRecord::new(1, "footer", "<p>Footer</p>"))
        .expect("insert block");

    block(&repo, Some("footer")).render().await.expect("render");
    block(&repo, Some("footer")).render().await.expect("render");
    block(&repo, Some("missing")).render().await.expect("render");
    block(&repo, None).render().await.expect("render");

    let counts: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(composite_key, _, _, _)| composite_key.key().name() == "cms_blocks_render_total")
        .filter_map(|(composite_key, _, _, value)| {
            let outcome = composite_key
                .key()
                .labels()
                .find(|label| label.key() == "outcome")?
                .value()
                .to_string();
            match value {
                DebugValue::Counter(count) => Some((outcome, count)),
                _ => None,
            }
        })
        .collect();

    assert_eq!(counts.get("rendered"), Some(&2));
    assert_eq!(counts.get("not_found"), Some(&1));
    assert_eq!(counts.get("no_identifier"), Some(&1));
    assert_eq!(counts.get("error"), None);
}
