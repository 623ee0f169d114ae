use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;

    #[test]
    fn test_embedder_config_default_is_stub() {
        let config = EmbedderConfig::default();
        assert!(config.model_path.is_none());
        assert_eq!(config.embedding_dim, EMBEDDER_DIM);
        assert_eq!(config.max_seq_len, crate::inference::MAX_INPUT_TOKENS);
    }

    #[test]
    fn test_embedder_config_new() {
        let config = EmbedderConfig::new("/models/minilm");
        assert_eq!(config.model_path, Some(PathBuf::from("/models/minilm")));
    }

    #[test]
    fn test_embedder_config_validate_missing_dir() {
        let config = EmbedderConfig::new("/nonexistent/minilm");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_embedder_load_missing_dir_fails() {
        let result = SentenceEmbedder::load(EmbedderConfig::new("/nonexistent/minilm"));
        assert!(matches!(
            result,
            Err(InferenceError::ModelLoadFailed { .. })
        ));
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_stub_loads_without_files() {
        let embedder = SentenceEmbedder::stub().expect("stub should load");
        assert!(embedder.is_stub());
        assert_eq!(embedder.embedding_dim(), EMBEDDER_DIM);
    }

    #[test]
    fn test_stub_embedding_deterministic() {
        let embedder = SentenceEmbedder::stub().expect("stub should load");

        let e1 = embedder.embed("Hello, world!").expect("embed");
        let e2 = embedder.embed("Hello, world!").expect("embed");
        assert_eq!(e1, e2);
    }

    #[test]
    fn test_stub_embedding_distinct_inputs() {
        let embedder = SentenceEmbedder::stub().expect("stub should load");

        let e1 = embedder.embed("Hello").expect("embed");
        let e2 = embedder.embed("World").expect("embed");
        assert_ne!(e1, e2);
    }

    #[test]
    fn test_stub_embedding_normalized() {
        let embedder = SentenceEmbedder::stub().expect("stub should load");

        for text in ["short", "a longer sentence with several words", ""] {
            let emb = embedder.embed(text).expect("embed");
            let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!(
                (norm - 1.0).abs() < 0.01,
                "embedding of {:?} should be normalized, got norm {}",
                text,
                norm
            );
        }
    }

    #[test]
    fn test_stub_embedding_dimension() {
        let config = EmbedderConfig {
            embedding_dim: 128,
            ..EmbedderConfig::stub()
        };
        let embedder = SentenceEmbedder::load(config).expect("stub should load");

        assert_eq!(embedder.embed("test").expect("embed").len(), 128);
        assert_eq!(embedder.embedding_dim(), 128);
    }
}

mod cosine_tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.6, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_unnormalized_inputs() {
        // Scaling either input must not change the similarity.
        let a = vec![3.0, 4.0];
        let b = vec![30.0, 40.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_of_stub_embeddings_in_range() {
        let embedder = SentenceEmbedder::stub().expect("stub should load");

        let e1 = embedder.embed("first text").expect("embed");
        let e2 = embedder.embed("second text").expect("embed");

        let sim = cosine_similarity(&e1, &e2);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_cosine_same_text_is_one() {
        let embedder = SentenceEmbedder::stub().expect("stub should load");

        let e1 = embedder.embed("the same answer").expect("embed");
        let e2 = embedder.embed("the same answer").expect("embed");

        assert!((cosine_similarity(&e1, &e2) - 1.0).abs() < 1e-5);
    }
}

/// Integration tests for real model inference.
/// Run with: cargo test --lib embedder -- --ignored
#[test]
#[ignore]
fn test_embedder_real_model_semantic_similarity() {
    let model_path = std::env::var(EmbedderConfig::ENV_MODEL_PATH)
        .unwrap_or_else(|_| "/models/all-MiniLM-L6-v2".to_string());

    let embedder = SentenceEmbedder::load(EmbedderConfig::new(model_path)).expect("load model");
    assert!(!embedder.is_stub());

    let e1 = embedder.embed("The cat sat on the mat").expect("embed");
    let e2 = embedder.embed("A feline rested on the rug").expect("embed");
    let e3 = embedder
        .embed("Quantum physics explains wave functions")
        .expect("embed");

    let sim_related = cosine_similarity(&e1, &e2);
    let sim_unrelated = cosine_similarity(&e1, &e3);

    assert!(
        sim_related > sim_unrelated,
        "related texts should score higher: {} vs {}",
        sim_related,
        sim_unrelated
    );
}
