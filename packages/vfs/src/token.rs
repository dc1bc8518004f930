//! Cross-connection authorization tokens.
//!
//! A connection holding one directory can authorize a *different*
//! connection's directory as a rename/link destination without learning
//! that node's identity. The token's cookie is an index into an explicit
//! registry with a generation check and a weak node reference, so a
//! discarded or stale token can never resolve to a node again — and never
//! to a *different* node whose allocation reused the memory.

use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::node::Vnode;
use crate::Status;

bitflags! {
    /// Rights carried by a token handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TokenRights: u32 {
        const DUPLICATE = 1 << 0;
        const TRANSFER = 1 << 1;
        const SIGNAL = 1 << 2;
        const WAIT = 1 << 3;
    }
}

/// Rights granted on duplicates handed across connections: enough to pass
/// the token around and copy it, nothing more.
const HANDOFF_RIGHTS: TokenRights = TokenRights::DUPLICATE.union(TokenRights::TRANSFER);

/// An ephemeral authorization handle naming one node as a rename/link
/// destination.
///
/// Cheap to clone; validity is decided by the registry at resolve time,
/// not by the handle itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    index: u32,
    generation: u32,
    rights: TokenRights,
}

impl Token {
    pub fn rights(&self) -> TokenRights {
        self.rights
    }

    /// A duplicate restricted to `rights`. Fails if this handle lacks the
    /// DUPLICATE right or tries to widen its rights.
    pub fn duplicate(&self, rights: TokenRights) -> Result<Token, Status> {
        if !self.rights.contains(TokenRights::DUPLICATE) || !self.rights.contains(rights) {
            return Err(Status::InvalidArgument);
        }
        Ok(Token { rights, ..*self })
    }
}

/// A connection's token slot: at most one live internal token per
/// connection, minted lazily and discarded at teardown.
#[derive(Default)]
pub struct TokenSlot(Option<Token>);

impl TokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_minted(&self) -> bool {
        self.0.is_some()
    }
}

/// Registry mapping live tokens to node identities. Guarded by the
/// structural lock above it.
#[derive(Default)]
pub(crate) struct TokenRegistry {
    slots: Vec<RegistrySlot>,
    free: Vec<u32>,
}

struct RegistrySlot {
    generation: u32,
    node: Option<Weak<dyn Vnode>>,
}

impl TokenRegistry {
    /// Return a handoff duplicate for `slot`, minting the internal token
    /// first if the slot is empty. Repeat calls duplicate the same grant
    /// rather than minting fresh ones.
    pub(crate) fn mint(
        &mut self,
        vn: &Arc<dyn Vnode>,
        slot: &mut TokenSlot,
    ) -> Result<Token, Status> {
        if let Some(internal) = &slot.0 {
            return internal.duplicate(HANDOFF_RIGHTS);
        }

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].node = Some(Arc::downgrade(vn));
                index
            }
            None => {
                self.slots.push(RegistrySlot {
                    generation: 0,
                    node: Some(Arc::downgrade(vn)),
                });
                (self.slots.len() - 1) as u32
            }
        };

        let internal = Token {
            index,
            generation: self.slots[index as usize].generation,
            rights: TokenRights::all(),
        };
        let handoff = internal.duplicate(HANDOFF_RIGHTS)?;
        slot.0 = Some(internal);
        Ok(handoff)
    }

    /// Resolve a token back to its node. A discarded slot, a stale
    /// generation, or a node that has since been destroyed all fail as
    /// invalid — never as some other node.
    pub(crate) fn resolve(&self, token: &Token) -> Result<Arc<dyn Vnode>, Status> {
        let slot = self
            .slots
            .get(token.index as usize)
            .ok_or(Status::InvalidArgument)?;
        if slot.generation != token.generation {
            return Err(Status::InvalidArgument);
        }
        let node = slot.node.as_ref().ok_or(Status::InvalidArgument)?;
        node.upgrade().ok_or(Status::InvalidArgument)
    }

    /// Invalidate `slot`'s token. Synchronous: the moment this returns, no
    /// outstanding duplicate resolves to a node again. Must run at
    /// connection teardown, before the referenced node's ordinary
    /// lifecycle can drop it.
    pub(crate) fn discard(&mut self, slot: &mut TokenSlot) {
        if let Some(internal) = slot.0.take() {
            let entry = &mut self.slots[internal.index as usize];
            entry.node = None;
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(internal.index);
        }
    }
}
