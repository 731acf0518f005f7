//! Default feeds plus one extra rule that pages on medical alarms.
//!
//! ```bash
//! cargo run -p vahti-runtime --example simple_pipeline
//! ```

use vahti_runtime::prelude::*;

fn is_medical(event: &AlarmEvent) -> bool {
    event.event_type == EventType::Medical
}

fn page_on_call(event: &AlarmEvent) -> Actions<'_> {
    Box::new(std::iter::once_with(move || {
        DispatchAction::new(
            &event.event_id,
            ActionTarget::InstantMessage,
            format!("MEDICAL — {} | {}", event.zone, event.source_id),
        )
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = RuntimeBuilder::new()
        .configure(|pipeline| async move {
            Ok(pipeline.rule(Rule::new("medical", 2, is_medical, page_on_call)))
        })
        .await?;

    println!(
        "{} events, {} dispatched",
        state.total_events, state.dispatched_count
    );
    Ok(())
}
