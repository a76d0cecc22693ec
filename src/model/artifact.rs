//! Serialized model envelope: format tag, provenance, schema, forest and a checksum
//! over schema, forest, params and seed. Model id and training time are not covered.

use super::{ForestParams, Model, RandomForest};
use crate::error::{Error, Result};
use crate::features::FeatureSchema;
use crate::storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const FORMAT: &str = "motion-guard/random-forest";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    format: String,
    format_version: u32,
    model_id: Uuid,
    trained_at: DateTime<Utc>,
    seed: u64,
    params: ForestParams,
    schema: FeatureSchema,
    forest: RandomForest,
    checksum: String,
}

fn payload_checksum(
    schema: &FeatureSchema,
    forest: &RandomForest,
    params: &ForestParams,
    seed: u64,
) -> Result<String> {
    let bytes = serde_json::to_vec(&(schema, forest, params, seed))?;
    Ok(storage::checksum(&bytes))
}

impl Model {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let envelope = Envelope {
            format: FORMAT.to_string(),
            format_version: FORMAT_VERSION,
            model_id: self.id,
            trained_at: self.trained_at,
            seed: self.seed,
            params: self.params,
            schema: self.schema.clone(),
            forest: self.forest.clone(),
            checksum: payload_checksum(&self.schema, &self.forest, &self.params, self.seed)?,
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    /// Decode and verify an artifact. Anything that fails verification, including a
    /// forest that could not be evaluated safely, is [`Error::CorruptArtifact`],
    /// except an unsupported feature schema.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let env: Envelope =
            serde_json::from_slice(bytes).map_err(|e| Error::CorruptArtifact(e.to_string()))?;

        if env.format != FORMAT || env.format_version != FORMAT_VERSION {
            return Err(Error::CorruptArtifact(format!(
                "unsupported artifact format {} v{}",
                env.format, env.format_version
            )));
        }
        if payload_checksum(&env.schema, &env.forest, &env.params, env.seed)? != env.checksum {
            return Err(Error::CorruptArtifact("checksum mismatch".into()));
        }
        if env.forest.n_features() != env.schema.len() {
            return Err(Error::CorruptArtifact(format!(
                "forest expects {} features, schema lists {}",
                env.forest.n_features(),
                env.schema.len()
            )));
        }
        env.forest.check().map_err(Error::CorruptArtifact)?;
        FeatureSchema::v1().ensure_matches(&env.schema)?;

        Ok(Model {
            id: env.model_id,
            trained_at: env.trained_at,
            seed: env.seed,
            params: env.params,
            schema: env.schema,
            forest: env.forest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use serde_json::{json, Value};

    fn model() -> Model {
        let x = Array2::from_shape_vec(
            (8, 4),
            (0..32).map(|i| ((i * 7) % 11) as f64).collect(),
        )
        .unwrap();
        let y = [0, 1, 0, 1, 0, 1, 0, 1];
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&x, &y, &params, 3).unwrap();
        Model::new(FeatureSchema::v1(), forest, params, 3)
    }

    #[test]
    fn bytes_round_trip() {
        let m = model();
        let back = Model::from_bytes(&m.to_bytes().unwrap()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn tampered_payload_is_corrupt() {
        let m = model();
        let mut v: serde_json::Value = serde_json::from_slice(&m.to_bytes().unwrap()).unwrap();
        v["schema"]["version"] = serde_json::json!(2);
        let err = Model::from_bytes(&serde_json::to_vec(&v).unwrap()).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)), "{:?}", err);
    }

    /// Recompute the checksum after editing, as a deliberate forger would.
    fn reseal(v: &mut Value) {
        let schema: FeatureSchema = serde_json::from_value(v["schema"].clone()).unwrap();
        let forest: RandomForest = serde_json::from_value(v["forest"].clone()).unwrap();
        let params: ForestParams = serde_json::from_value(v["params"].clone()).unwrap();
        let seed = v["seed"].as_u64().unwrap();
        v["checksum"] = json!(payload_checksum(&schema, &forest, &params, seed).unwrap());
    }

    fn load_edited(edit: impl FnOnce(&mut Value)) -> Result<Model> {
        let mut v: Value = serde_json::from_slice(&model().to_bytes().unwrap()).unwrap();
        edit(&mut v);
        reseal(&mut v);
        Model::from_bytes(&serde_json::to_vec(&v).unwrap())
    }

    fn leaf() -> Value {
        json!({"node": "leaf", "proba": [0.5, 0.5]})
    }

    fn split(feature: usize, left: usize, right: usize) -> Value {
        json!({"node": "split", "feature": feature, "threshold": 1.0, "left": left, "right": right})
    }

    #[test]
    fn resealed_untouched_artifact_loads() {
        assert!(load_edited(|_| {}).is_ok());
    }

    #[test]
    fn empty_forest_is_corrupt() {
        let err = load_edited(|v| v["forest"]["trees"] = json!([])).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)), "{:?}", err);
    }

    #[test]
    fn empty_tree_is_corrupt() {
        let err = load_edited(|v| v["forest"]["trees"][0]["nodes"] = json!([])).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)), "{:?}", err);
    }

    #[test]
    fn self_referencing_split_is_corrupt() {
        let err = load_edited(|v| v["forest"]["trees"][0]["nodes"] = json!([split(0, 0, 1), leaf()]))
            .unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)), "{:?}", err);
    }

    #[test]
    fn dangling_child_is_corrupt() {
        let err = load_edited(|v| {
            v["forest"]["trees"][0]["nodes"] = json!([split(0, 1, 9), leaf(), leaf()])
        })
        .unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)), "{:?}", err);
    }

    #[test]
    fn out_of_range_feature_is_corrupt() {
        let err = load_edited(|v| {
            v["forest"]["trees"][0]["nodes"] = json!([split(9, 1, 2), leaf(), leaf()])
        })
        .unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)), "{:?}", err);
    }

    #[test]
    fn edited_provenance_fails_checksum() {
        let m = model();
        for (key, value) in [("seed", json!(99)), ("params", json!({"n_trees": 500}))] {
            let mut v: Value = serde_json::from_slice(&m.to_bytes().unwrap()).unwrap();
            v[key] = value;
            let err = Model::from_bytes(&serde_json::to_vec(&v).unwrap()).unwrap_err();
            assert!(matches!(err, Error::CorruptArtifact(_)), "{}: {:?}", key, err);
        }
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(Model::from_bytes(b"not json"), Err(Error::CorruptArtifact(_))));
        assert!(matches!(Model::from_bytes(b"{\"format\":\"x\"}"), Err(Error::CorruptArtifact(_))));
    }
}
