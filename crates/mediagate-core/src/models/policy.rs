use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allow,
    Block,
}

/// Outcome of applying the moderation policy to one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    pub verdict: Verdict,
    pub reason: String,
    /// Disallowed categories that caused a block, sorted and deduplicated.
    pub matched: Vec<String>,
}

impl PolicyDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Allow,
            reason: reason.into(),
            matched: Vec::new(),
        }
    }

    pub fn block(reason: impl Into<String>, matched: Vec<String>) -> Self {
        Self {
            verdict: Verdict::Block,
            reason: reason.into(),
            matched,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }

    /// Trade an `Allow` decision for the clearance the uploader requires.
    ///
    /// A `Block` decision is handed back unchanged.
    pub fn into_clearance(self) -> Result<Clearance, PolicyDecision> {
        match self.verdict {
            Verdict::Allow => Ok(Clearance { decision: self }),
            Verdict::Block => Err(self),
        }
    }
}

/// Proof that content passed the policy. Only obtainable from an `Allow`
/// decision, so blocked content can never reach the uploader.
#[derive(Debug, Clone)]
pub struct Clearance {
    decision: PolicyDecision,
}

impl Clearance {
    pub fn decision(&self) -> &PolicyDecision {
        &self.decision
    }
}
