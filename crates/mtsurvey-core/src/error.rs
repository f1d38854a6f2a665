// crates/mtsurvey-core/src/error.rs

use thiserror::Error;

use crate::mirror::FieldKind;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot coerce '{value}' into {kind:?} field '{field}'")]
    Coercion {
        field: String,
        kind: FieldKind,
        value: String,
    },

    #[error("calibration curve arrays differ in length: f={f_len} a={a_len} p={p_len}")]
    CurveLength {
        f_len: usize,
        a_len: usize,
        p_len: usize,
    },
}

pub type Result<T> = std::result::Result<T, SurveyError>;
