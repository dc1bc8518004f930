//! Served client connections.

use std::sync::Arc;

use crate::channel::ChannelHandle;
use crate::node::Vnode;
use crate::token::TokenSlot;
use crate::OpenFlags;

/// Identifier for a registered connection, echoed back by the wire
/// layer's closed-callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// One served channel bound to one node.
///
/// Created when a serve succeeds, destroyed exactly once when the wire
/// layer reports the remote end closed. The wire layer guarantees that
/// callbacks for a given connection never re-enter; this type does not.
pub struct Connection {
    vnode: Arc<dyn Vnode>,
    channel: ChannelHandle,
    flags: OpenFlags,
    pub(crate) token: TokenSlot,
}

impl Connection {
    pub fn new(vnode: Arc<dyn Vnode>, channel: ChannelHandle, flags: OpenFlags) -> Self {
        Self {
            vnode,
            channel,
            flags,
            token: TokenSlot::new(),
        }
    }

    pub fn vnode(&self) -> &Arc<dyn Vnode> {
        &self.vnode
    }

    pub fn channel(&self) -> &ChannelHandle {
        &self.channel
    }

    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// The connection's token slot, for wire layers that drive the token
    /// protocol directly rather than through the registry id.
    pub fn token_slot(&mut self) -> &mut TokenSlot {
        &mut self.token
    }
}
