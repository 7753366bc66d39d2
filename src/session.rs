//! Signing Session
//!
//! Two sources of state describe a contract while it is on screen: the last
//! snapshot confirmed by the server and signatures recorded locally right
//! after a successful sign request. The local ones give instant feedback and
//! are replaced as soon as a newer server snapshot arrives.
//!
//! Every fetch and every local mutation takes a sequence number. A server
//! snapshot is only applied when its fetch was issued after everything that
//! has been applied so far, so a slow response never overwrites newer state.

use tracing::{debug, warn};

use crate::{
    contracts::SigningSnapshot,
    signatures::Signature,
    status::{SigningProgress, SigningStatus},
};

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Where the current view comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSource {
    /// Exactly what the server last returned.
    Server,

    /// Server snapshot plus local changes not yet confirmed.
    Optimistic,
}

/// Result of offering a server snapshot to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The snapshot replaced the confirmed state.
    Applied,

    /// The fetch was issued before newer state was applied and was dropped.
    Stale,
}

/// Reconciles optimistic local state with server-confirmed snapshots.
#[derive(Debug, Clone)]
pub struct SigningSession {
    confirmed: SigningSnapshot,
    optimistic: Vec<Signature>,
    local_enabled: Option<bool>,
    issued: u64,
    applied: u64,
}

impl SigningSession {
    /// Start a session from a snapshot the server just returned.
    #[must_use]
    pub fn new(confirmed: SigningSnapshot) -> Self {
        Self {
            confirmed,
            optimistic: Vec::new(),
            local_enabled: None,
            issued: 0,
            applied: 0,
        }
    }

    /// Take a ticket for a fetch that is about to start.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;

        FetchTicket(self.issued)
    }

    /// Offer a server snapshot fetched with `ticket`.
    ///
    /// Applied snapshots replace all optimistic state.
    pub fn apply_server_snapshot(
        &mut self,
        ticket: FetchTicket,
        snapshot: SigningSnapshot,
    ) -> SnapshotOutcome {
        if ticket.0 <= self.applied {
            debug!(
                ticket = ticket.0,
                applied = self.applied,
                "dropping stale signing snapshot"
            );

            return SnapshotOutcome::Stale;
        }

        let previous = self.derived().status;
        let next = snapshot.derived().status;

        if !previous.can_transition_to(next) {
            warn!(
                previous = %previous,
                next = %next,
                "server snapshot moved signing status backwards"
            );
        }

        self.confirmed = snapshot;
        self.optimistic.clear();
        self.local_enabled = None;
        self.applied = ticket.0;

        SnapshotOutcome::Applied
    }

    /// Record a signature the server accepted but has not yet been refetched.
    ///
    /// Fetches started before this call become stale.
    pub fn record_local_signature(&mut self, signature: Signature) {
        self.mark_local_mutation();

        let already_present = self
            .current_signatures()
            .any(|existing| existing.is_by(&signature.signer_email));

        if !already_present {
            self.optimistic.push(signature);
        }
    }

    /// Record that signing was enabled with `required_signers`.
    ///
    /// Enabling starts a fresh signing round, so the signature list is reset.
    pub fn record_enabled(&mut self, required_signers: Vec<String>) {
        self.mark_local_mutation();

        self.confirmed = SigningSnapshot {
            public_signing_enabled: true,
            required_signers,
            signatures: Vec::new(),
        };
        self.optimistic.clear();
        self.local_enabled = None;
    }

    /// Record that signing was disabled. Signing history stays visible.
    pub fn record_disabled(&mut self) {
        self.mark_local_mutation();

        self.local_enabled = Some(false);
    }

    /// Current merged view of the contract.
    #[must_use]
    pub fn snapshot(&self) -> SigningSnapshot {
        SigningSnapshot {
            public_signing_enabled: self
                .local_enabled
                .unwrap_or(self.confirmed.public_signing_enabled),
            required_signers: self.confirmed.required_signers.clone(),
            signatures: self.current_signatures().cloned().collect(),
        }
    }

    /// The last snapshot confirmed by the server.
    #[must_use]
    pub fn confirmed(&self) -> &SigningSnapshot {
        &self.confirmed
    }

    /// Derived status of the merged view.
    #[must_use]
    pub fn derived(&self) -> SigningProgress {
        self.snapshot().derived()
    }

    /// Derived status of the current view, short form.
    #[must_use]
    pub fn status(&self) -> SigningStatus {
        self.derived().status
    }

    /// Whether local state not yet confirmed by the server is included.
    #[must_use]
    pub fn source(&self) -> StateSource {
        if self.optimistic.is_empty() && self.local_enabled.is_none() {
            StateSource::Server
        } else {
            StateSource::Optimistic
        }
    }

    fn current_signatures(&self) -> impl Iterator<Item = &Signature> {
        self.confirmed.signatures.iter().chain(self.optimistic.iter())
    }

    fn mark_local_mutation(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
    }
}
