//! ONNX sentence-transformer embedder.
//!
//! Loads a SentenceTransformers ONNX model and tokenizer and embeds each input
//! with mean pooling over the attention mask. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;
    use std::sync::Arc;

    use embedrank_core::{Error, Result};
    use ndarray::{Array1, Array2};
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::{debug, info};

    use crate::embedder::{check_input, EmbeddingProvider};

    /// Maximum sequence length for the model.
    const MAX_SEQ_LEN: usize = 512;

    /// Default embedding dimension (all-MiniLM-L6-v2).
    const DEFAULT_DIM: usize = 384;

    fn inference<E: std::fmt::Display>(what: &str) -> impl FnOnce(E) -> Error + '_ {
        move |e| Error::Inference(format!("{}: {}", what, e))
    }

    /// ONNX embedding engine.
    pub struct OnnxEmbedder {
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        dimension: usize,
    }

    impl OnnxEmbedder {
        /// Load an ONNX model and tokenizer from the given directory.
        ///
        /// Expects:
        /// - `model_dir/model.onnx` (ONNX model file)
        /// - `model_dir/tokenizer.json` (HuggingFace tokenizer)
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::Config(format!("Model not found: {}", model_path.display())));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Config(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // With load-dynamic feature, ORT_DYLIB_PATH env var must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(inference("Failed to create session builder"))?
                .with_intra_threads(2)
                .map_err(inference("Failed to set threads"))?
                .commit_from_file(&model_path)
                .map_err(inference("Failed to load ONNX model"))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(inference("Failed to load tokenizer"))?;

            info!(
                "ONNX embedder loaded: dim={}, model={}",
                DEFAULT_DIM,
                model_path.display()
            );

            Ok(Self {
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                dimension: DEFAULT_DIM,
            })
        }

        /// Run inference on one input.
        fn infer(&self, text: &str) -> Result<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(inference("Tokenization failed"))?;

            let input_ids = encoding.get_ids();
            let attention_mask = encoding.get_attention_mask();

            // Truncate to max sequence length
            let seq_len = input_ids.len().min(MAX_SEQ_LEN);
            let input_ids = &input_ids[..seq_len];
            let attention_mask = &attention_mask[..seq_len];

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(inference("Failed to create ids tensor"))?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(inference("Failed to create mask tensor"))?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
                .map_err(inference("Failed to create type_ids tensor"))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(inference("ONNX inference failed"))?;

            // [1, seq_len, dim] token embeddings need pooling; [1, dim] is already pooled
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(inference("Failed to extract output tensor"))?;

            let shape_dims: Vec<i64> = shape.iter().copied().collect();

            match shape_dims.len() {
                3 => {
                    let dim = shape_dims[2] as usize;
                    let mask_f32: Vec<f32> = attention_mask.iter().map(|&m| m as f32).collect();
                    let mask_sum: f32 = mask_f32.iter().sum();
                    if mask_sum < 1e-9 {
                        // Nothing to pool: unknown input
                        return Ok(Array1::zeros(dim));
                    }

                    let mut pooled = Array1::zeros(dim);
                    for (i, &m) in mask_f32.iter().enumerate() {
                        if m > 0.0 {
                            let offset = i * dim;
                            for d in 0..dim {
                                pooled[d] += data[offset + d] * m;
                            }
                        }
                    }
                    Ok(pooled / mask_sum)
                }
                2 => {
                    let dim = shape_dims[1] as usize;
                    Ok(Array1::from_vec(data[..dim].to_vec()))
                }
                _ => Err(Error::Inference(format!(
                    "Unexpected output shape: {:?}",
                    shape_dims
                ))),
            }
        }
    }

    impl EmbeddingProvider for OnnxEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>> {
            for text in texts {
                check_input(text)?;
            }

            let mut matrix = Array2::zeros((texts.len(), self.dimension));
            // Sequential; the session is behind a single lock anyway
            for (i, text) in texts.iter().enumerate() {
                let row = self.infer(text)?;
                if row.len() != self.dimension {
                    return Err(Error::DimensionMismatch {
                        expected: self.dimension,
                        actual: row.len(),
                    });
                }
                matrix.row_mut(i).assign(&row);
            }
            debug!("Embedded {} texts with ONNX", texts.len());
            Ok(matrix)
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
