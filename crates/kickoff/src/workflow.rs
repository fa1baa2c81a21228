//! One pass of the manual workflow trigger.

use kickoff_cloud::{ArticleStore, CloudError, MessagePublisher};
use kickoff_core::{ArticleRef, TriggerSummary, WorkflowConfig};

/// Queue every pending article for processing.
///
/// Articles are handled one at a time: the document id is published and
/// acknowledged before the status field is switched to the queued status, so
/// an article is never marked queued without a message behind it. A failure
/// on one article is logged and counted; the remaining articles are still
/// processed. Only a failing query aborts the run.
pub async fn run_trigger(
    store: &dyn ArticleStore,
    publisher: &dyn MessagePublisher,
    workflow: &WorkflowConfig,
) -> Result<TriggerSummary, CloudError> {
    let articles = store
        .find_by_status(
            &workflow.collection,
            &workflow.status_field,
            &workflow.pending_status,
        )
        .await?;

    tracing::info!(
        collection = %workflow.collection,
        pending = articles.len(),
        "queueing pending articles"
    );

    let mut summary = TriggerSummary::default();
    for article in &articles {
        match queue_article(store, publisher, workflow, article).await {
            Ok(message_id) => {
                tracing::info!(
                    document = %article.id,
                    %message_id,
                    "queued document for processing"
                );
                summary.processed += 1;
            }
            Err(e) => {
                tracing::error!(document = %article.id, error = %e, "failed to queue document");
                summary.errors += 1;
            }
        }
    }

    tracing::info!(
        processed = summary.processed,
        errors = summary.errors,
        "{}",
        summary.message()
    );
    Ok(summary)
}

async fn queue_article(
    store: &dyn ArticleStore,
    publisher: &dyn MessagePublisher,
    workflow: &WorkflowConfig,
    article: &ArticleRef,
) -> Result<String, CloudError> {
    let message_id = publisher.publish(article.id.as_bytes()).await?;
    store
        .set_status(article, &workflow.status_field, &workflow.queued_status)
        .await?;
    Ok(message_id)
}
