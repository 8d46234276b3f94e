//! Per-workflow request tokens; issuing one supersedes every earlier token of that workflow.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Listing,
    Viewing,
    Analysis,
}

impl Workflow {
    pub fn as_str(self) -> &'static str {
        match self {
            Workflow::Listing => "listing",
            Workflow::Viewing => "viewing",
            Workflow::Analysis => "analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub workflow: Workflow,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestTokens {
    listing: u64,
    viewing: u64,
    analysis: u64,
}

impl RequestTokens {
    fn slot(&mut self, workflow: Workflow) -> &mut u64 {
        match workflow {
            Workflow::Listing => &mut self.listing,
            Workflow::Viewing => &mut self.viewing,
            Workflow::Analysis => &mut self.analysis,
        }
    }

    pub fn issue(&mut self, workflow: Workflow) -> RequestToken {
        let slot = self.slot(workflow);
        *slot += 1;
        RequestToken {
            workflow,
            seq: *slot,
        }
    }

    /// Supersedes any in-flight request of `workflow` without starting a new one.
    pub fn invalidate(&mut self, workflow: Workflow) {
        *self.slot(workflow) += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        let current = match token.workflow {
            Workflow::Listing => self.listing,
            Workflow::Viewing => self.viewing,
            Workflow::Analysis => self.analysis,
        };
        current == token.seq
    }
}
