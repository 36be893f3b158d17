//! End-to-end pipeline behaviour with stub collaborators.

use kbase_context::{ChunkConfig, ChunkEmbedder, DocumentIndex, QaPipeline, split_text};
use kbase_core::{ChunkStrategy, EmbedFailurePolicy, Error, KbaseConfig};
use kbase_providers::{MockProvider, StubEmbedder};

/// Two 599-character paragraphs: 1200 characters with the separator.
fn two_paragraph_document() -> (String, String, String) {
    let first = "A".repeat(599);
    let second = "B".repeat(599);
    let document = format!("{first}\n\n{second}");
    assert_eq!(document.chars().count(), 1200);
    (document, first, second)
}

/// Stub that maps chunk 0 to [1,0,0], chunk 1 to [0,1,0], and the
/// test question to [1,0,0].
fn scenario_embedder(first: &str) -> StubEmbedder {
    StubEmbedder::new(vec![0.0, 0.0, 1.0])
        .with_vector(first, vec![1.0, 0.0, 0.0])
        .with_vector("BBBB", vec![0.0, 1.0, 0.0])
        .with_vector("first paragraph", vec![1.0, 0.0, 0.0])
}

fn scenario_pipeline(embedder: StubEmbedder, answerer: MockProvider) -> QaPipeline<StubEmbedder, MockProvider> {
    QaPipeline::new(embedder, answerer)
        .with_chunk_config(ChunkConfig::new(500, 50).expect("valid config"))
        .with_failure_policy(EmbedFailurePolicy::ZeroVector, 3)
}

/// Chunk, pair with fixed vectors, query with chunk 0's vector: chunk 0 comes back verbatim.
#[test]
fn test_two_paragraph_retrieval() {
    let (document, first, _) = two_paragraph_document();
    let chunks = split_text(&document, &ChunkConfig::new(500, 50).expect("valid config"));
    assert_eq!(chunks.len(), 2);

    let index = DocumentIndex::from_parts(chunks, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])
        .expect("index");
    let hits = index.search(&[1.0, 0.0, 0.0], 1).expect("search");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, first);
}

/// The same scenario driven through the pipeline with a stub embedder.
#[tokio::test]
async fn test_pipeline_retrieves_first_chunk() {
    let (document, first, _) = two_paragraph_document();
    let pipeline = scenario_pipeline(scenario_embedder(&first), MockProvider::new("mock"))
        .with_top_k(1);

    let index = pipeline.ingest(&document).await.expect("ingest");
    assert_eq!(index.len(), 2);

    let hits = pipeline
        .retrieve(&index, "What does the first paragraph say?")
        .await
        .expect("retrieve");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].index, 0);
    assert_eq!(hits[0].text, first);
}

/// The answerer receives the question and the retrieved chunks in rank order.
#[tokio::test]
async fn test_ask_passes_ranked_context() {
    let (document, first, _) = two_paragraph_document();
    let answerer = MockProvider::new("mock").with_response("first paragraph", "It is all As.");
    let pipeline = scenario_pipeline(scenario_embedder(&first), answerer.clone()).with_top_k(2);

    let index = pipeline.ingest(&document).await.expect("ingest");
    let answer = pipeline
        .ask(&index, "What does the first paragraph say?")
        .await
        .expect("ask");

    assert_eq!(answer.response.text, "It is all As.");
    let source_indices: Vec<usize> = answer.sources.iter().map(|hit| hit.index).collect();
    assert_eq!(source_indices, vec![0, 1]);

    let history = answerer.get_call_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question, "What does the first paragraph say?");
    assert_eq!(history[0].chunks[0], first);
    assert_eq!(history[0].chunks.len(), 2);

    let json = serde_json::to_value(&answer).expect("serialize answer");
    assert_eq!(json["response"]["text"], "It is all As.");
    assert_eq!(json["sources"][0]["index"], 0);
    assert_eq!(json["sources"][1]["index"], 1);
    assert_eq!(json["sources"][0]["text"], first.as_str());
}

/// The recursive strategy indexes every line of a document with no blank lines.
#[tokio::test]
async fn test_recursive_strategy_ingest() {
    let stub = StubEmbedder::new(vec![1.0, 0.0]);
    let config = ChunkConfig::new(20, 0)
        .expect("valid config")
        .with_strategy(ChunkStrategy::Recursive);
    let pipeline = QaPipeline::new(stub.clone(), MockProvider::new("mock")).with_chunk_config(config);

    let index = pipeline
        .ingest("alpha line one\nbeta line two\ngamma line three")
        .await
        .expect("ingest");

    let texts: Vec<&str> = index.iter().map(|entry| entry.text.as_str()).collect();
    assert_eq!(texts, vec!["alpha line one", "beta line two", "gamma line three"]);
    assert_eq!(stub.call_count(), 3);
}

/// Asking an empty index fails without calling the answerer.
#[tokio::test]
async fn test_ask_empty_index() {
    let answerer = MockProvider::new("mock");
    let pipeline = QaPipeline::new(StubEmbedder::new(vec![1.0]), answerer.clone());

    let result = pipeline.ask(&DocumentIndex::default(), "anything?").await;
    assert!(matches!(result, Err(Error::EmptyIndex)));
    assert_eq!(answerer.call_count(), 0);
}

/// Under the zero-vector policy a failed chunk still gets indexed and sinks to the bottom.
#[tokio::test]
async fn test_zero_vector_policy_demotes_failed_chunk() {
    let (document, first, _) = two_paragraph_document();
    let embedder = scenario_embedder(&first)
        .with_vector("both", vec![1.0, 1.0, 0.0])
        .failing_on("BBBB");
    let pipeline = scenario_pipeline(embedder, MockProvider::new("mock"));

    let index = pipeline.ingest(&document).await.expect("ingest");
    let stored: Vec<Vec<f32>> = index.iter().map(|entry| entry.embedding.clone()).collect();
    assert_eq!(stored, vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]]);

    let hits = pipeline
        .retrieve(&index, "ask about both")
        .await
        .expect("retrieve");
    let order: Vec<usize> = hits.iter().map(|hit| hit.index).collect();
    assert_eq!(order, vec![0, 1]);
    assert_eq!(hits[1].score, 0.0);
}

/// Under the propagate policy the first provider error aborts ingestion.
#[tokio::test]
async fn test_propagate_policy_surfaces_error() {
    let (document, first, _) = two_paragraph_document();
    let embedder = scenario_embedder(&first).failing_on("BBBB");
    let pipeline = scenario_pipeline(embedder, MockProvider::new("mock"))
        .with_failure_policy(EmbedFailurePolicy::Propagate, 3);

    let result = pipeline.ingest(&document).await;
    assert!(matches!(result, Err(Error::Provider(_))));
}

/// Blank text is embedded as the placeholder word.
#[tokio::test]
async fn test_blank_text_uses_placeholder() {
    let stub = StubEmbedder::new(vec![1.0, 0.0]).with_vector("empty", vec![0.0, 1.0]);
    let embedder = ChunkEmbedder::new(&stub, EmbedFailurePolicy::ZeroVector, 2);

    let vector = embedder.embed_text(" \n\t ").await.expect("embed");
    assert_eq!(vector, vec![0.0, 1.0]);
    assert_eq!(stub.calls(), vec!["empty".to_owned()]);
}

/// An empty document becomes one placeholder-embedded chunk.
#[tokio::test]
async fn test_empty_document_ingests_one_chunk() {
    let stub = StubEmbedder::new(vec![1.0, 0.0]);
    let pipeline = QaPipeline::new(stub.clone(), MockProvider::new("mock"));

    let index = pipeline.ingest("").await.expect("ingest");
    assert_eq!(index.len(), 1);
    assert_eq!(index.chunk(0), Some(""));
    assert_eq!(stub.calls(), vec!["empty".to_owned()]);
}

/// Settings come from the config file sections.
#[test]
fn test_from_config() {
    let mut config = KbaseConfig::default();
    config.chunking.chunk_size = 300;
    config.chunking.overlap = 30;
    config.retrieval.top_k = 5;

    let pipeline = QaPipeline::from_config(StubEmbedder::new(vec![1.0]), MockProvider::new("mock"), &config)
        .expect("pipeline");
    assert_eq!(pipeline.chunk_config().chunk_size(), 300);
    assert_eq!(pipeline.chunk_config().overlap(), 30);
    assert_eq!(pipeline.top_k(), 5);

    config.chunking.overlap = 300;
    assert!(
        QaPipeline::from_config(StubEmbedder::new(vec![1.0]), MockProvider::new("mock"), &config)
            .is_err()
    );
}
