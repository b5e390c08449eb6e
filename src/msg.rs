use std::io::Write;

use serde::Serialize;

/// Result object a module prints on stdout, one JSON document per run.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Reply {
    Exit {
        changed: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
        #[serde(flatten)]
        data: serde_json::Map<String, serde_json::Value>,
    },
    Fail {
        failed: bool,
        msg: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
}

impl Reply {
    pub fn is_failed(&self) -> bool {
        matches!(self, Reply::Fail { .. })
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_failed() {
            1
        } else {
            0
        }
    }

    pub fn emit<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        serde_json::to_writer(&mut out, self)?;
        writeln!(out)?;
        out.flush()
    }
}
