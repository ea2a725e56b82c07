//! The network orchestration layer
//!
//! Owns the graph, drives peer and connection creation through the
//! configured factories, republishes structural changes as typed events,
//! and implements cascading teardown.
//!
//! ## Lifecycle
//!
//! Node payloads move `Pending -> Settled -> Removed`; edge payloads move
//! `Pending -> Open -> Closing -> Removed`. Registration in the graph is
//! synchronous with the call that initiates creation, so concurrent
//! operations referencing the same not-yet-created peer share one
//! pending entry and one factory invocation. Deleting a subject first
//! awaits its settlement; deleting a peer completes only once every
//! severed channel has fully closed.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use gossamer_core::{Channel, PassThrough, PeerId};
use gossamer_graph::{EdgeId, Graph, GraphChange};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::connection::{Connection, Link};
use crate::error::NetworkError;
use crate::event::{NetworkEvent, into_stream};
use crate::peer::{BasicPeer, Peer};
use crate::slot::{Slot, SlotSettler};

type PeerGraph<P> = Graph<PeerId, Slot<P>, Link<P>>;
type PeerGraphChange<P> = GraphChange<PeerId, Slot<P>, Link<P>>;

/// A concurrency-safe, event-emitting graph of peers and connections
///
/// Cheap to clone; clones share the same network. Must be created inside
/// a Tokio runtime (construction spawns the event forwarder task).
pub struct Network<P: Peer = BasicPeer> {
    inner: Arc<NetworkInner<P>>,
}

struct NetworkInner<P: Peer> {
    graph: Mutex<PeerGraph<P>>,
    config: NetworkConfig<P>,
    events: broadcast::Sender<NetworkEvent<P>>,
}

impl<P: Peer> std::fmt::Debug for Network<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network").finish_non_exhaustive()
    }
}

enum Registration<P: Peer> {
    Existing(Slot<P>),
    Fresh(SlotSettler<P>),
}

impl Network<BasicPeer> {
    /// Network with the default factories
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }
}

impl Default for Network<BasicPeer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Peer> Network<P> {
    /// Network with explicit configuration
    pub fn with_config(config: NetworkConfig<P>) -> Self {
        let mut graph = Graph::new();
        let changes = graph.subscribe();
        let (events, _) = broadcast::channel(config.event_capacity);
        tokio::spawn(forward_events(changes, events.clone()));
        Self {
            inner: Arc::new(NetworkInner {
                graph: Mutex::new(graph),
                config,
                events,
            }),
        }
    }

    // -- Creation --

    /// Register and create a peer
    ///
    /// The identifier is registered synchronously; the factory settles it
    /// afterwards. If the identifier is already registered the factory is
    /// not re-run: the existing (possibly still pending) peer is awaited
    /// and returned.
    ///
    /// # Errors
    ///
    /// [`NetworkError::MalformedPeer`] if the factory's peer does not
    /// report the registered identifier, or the factory's own error. A
    /// failed creation removes its registration.
    pub async fn add_peer(&self, id: PeerId) -> Result<P, NetworkError> {
        let registration = {
            let mut graph = self.inner.graph.lock();
            Self::register_peer(&mut graph, id)
        };
        self.resolve_registration(id, registration).await
    }

    /// Register and create a connection between two peers
    ///
    /// Missing endpoints are auto-created through the peer factory. The
    /// duplicate check and all registrations happen synchronously, so
    /// concurrent calls cannot race a second edge or a second peer
    /// factory invocation past this point.
    ///
    /// # Errors
    ///
    /// [`NetworkError::DuplicateConnection`] when any edge (pending or
    /// open, either direction) already joins the pair;
    /// [`NetworkError::MalformedConnection`] when the factory hands back
    /// a closed channel; endpoint or factory errors otherwise. A failed
    /// creation removes its edge.
    pub async fn add_connection(
        &self,
        from: PeerId,
        to: PeerId,
    ) -> Result<Connection<P>, NetworkError> {
        let (from_reg, to_reg, edge_id, link, settler) = {
            let mut graph = self.inner.graph.lock();
            if !graph.edges_between(&from, &to).is_empty() {
                return Err(NetworkError::DuplicateConnection { from, to });
            }
            let from_reg = Self::register_peer(&mut graph, from);
            let to_reg = Self::register_peer(&mut graph, to);
            let (slot, settler) = Slot::pending();
            let link = Link::new(slot);
            let edge_id = graph.add_edge(from, to, link.clone());
            (from_reg, to_reg, edge_id, link, settler)
        };
        debug!(from = %from, to = %to, "creating connection");

        let (from_result, to_result) = tokio::join!(
            self.resolve_registration(from, from_reg),
            self.resolve_registration(to, to_reg),
        );
        let created = match from_result.and_then(|f| to_result.map(|t| (f, t))) {
            Ok((from_peer, to_peer)) => self
                .open_channel(&from_peer, &to_peer)
                .await
                .map(|channel| Connection {
                    from: from_peer,
                    to: to_peer,
                    channel,
                }),
            Err(err) => Err(err),
        };

        match created {
            Ok(connection) => {
                // Watch before settling so a close racing the settlement
                // is never missed
                self.watch_channel(edge_id, link, connection.channel.clone());
                settler.settle(connection.clone());
                self.inner.graph.lock().touch_edge(edge_id);
                Ok(connection)
            }
            Err(err) => {
                warn!(from = %from, to = %to, error = %err, "connection creation failed");
                settler.fail(err.clone());
                self.inner.graph.lock().remove_edge(edge_id);
                link.mark_removed();
                Err(err)
            }
        }
    }

    // -- Deletion --

    /// Delete a peer and every connection touching it
    ///
    /// Completes only once every severed channel has fully closed; no
    /// open channel survives a peer's removal. A pending peer is awaited
    /// first (deletion never skips settlement).
    ///
    /// # Errors
    ///
    /// [`NetworkError::PeerNotFound`] when the identifier is not
    /// registered.
    pub async fn delete_peer(&self, id: PeerId) -> Result<(), NetworkError> {
        let slot = self
            .inner
            .graph
            .lock()
            .node(&id)
            .cloned()
            .ok_or(NetworkError::PeerNotFound(id))?;

        // A failed creation unwinds its own registration, so the peer is
        // gone either way once this resolves.
        let _ = slot.wait().await;

        loop {
            let links: Vec<Link<P>> = {
                let mut graph = self.inner.graph.lock();
                let links: Vec<Link<P>> = graph
                    .edges_touching(&id)
                    .into_iter()
                    .map(|(_, edge)| edge.payload.clone())
                    .collect();
                if links.is_empty() {
                    // Removal happens under the same lock that observed
                    // zero incident edges.
                    graph.remove_node(&id);
                }
                links
            };
            if links.is_empty() {
                break;
            }
            for link in links {
                self.sever(link).await;
            }
        }
        info!(peer = %id, "peer deleted");
        Ok(())
    }

    /// Delete the connection between a pair of peers
    ///
    /// The pair is unordered. Resolves once the channel has closed and
    /// the edge is gone from the graph.
    ///
    /// # Errors
    ///
    /// [`NetworkError::ConnectionNotFound`] when no edge joins the pair.
    pub async fn delete_connection(&self, from: PeerId, to: PeerId) -> Result<(), NetworkError> {
        let links: Vec<Link<P>> = {
            let graph = self.inner.graph.lock();
            graph
                .edges_between(&from, &to)
                .into_iter()
                .filter_map(|id| graph.edge(id).map(|edge| edge.payload.clone()))
                .collect()
        };
        if links.is_empty() {
            return Err(NetworkError::ConnectionNotFound { from, to });
        }
        for link in links {
            self.sever(link).await;
        }
        debug!(from = %from, to = %to, "connection deleted");
        Ok(())
    }

    /// Tear down the whole network
    ///
    /// Deletes every peer, cascading all connections, and resolves once
    /// every channel has fully closed and the graph is empty. Individual
    /// teardown failures are logged and do not stop the sweep; the first
    /// one is returned at the end. Safe to call while connections are
    /// already closing.
    pub async fn destroy(&self) -> Result<(), NetworkError> {
        info!("destroying network");
        let mut first_error = None;
        loop {
            let ids: Vec<PeerId> = {
                let graph = self.inner.graph.lock();
                graph.nodes().map(|(id, _)| *id).collect()
            };
            if ids.is_empty() {
                break;
            }
            for id in ids {
                match self.delete_peer(id).await {
                    Ok(()) => {}
                    // Concurrent teardown got there first
                    Err(NetworkError::PeerNotFound(_)) => {}
                    Err(err) => {
                        warn!(peer = %id, error = %err, "peer teardown failed");
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                }
            }
        }
        match first_error {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    // -- Reads --

    /// Snapshot of all settled peers (pending entries excluded)
    pub fn peers(&self) -> Vec<P> {
        let graph = self.inner.graph.lock();
        graph.nodes().filter_map(|(_, slot)| slot.get()).collect()
    }

    /// Snapshot of all settled connections (pending entries excluded)
    pub fn connections(&self) -> Vec<Connection<P>> {
        let graph = self.inner.graph.lock();
        graph
            .edges()
            .filter_map(|(_, edge)| edge.payload.slot.get())
            .collect()
    }

    /// Look up a settled peer by identifier
    pub fn peer(&self, id: &PeerId) -> Option<P> {
        self.inner.graph.lock().node(id).and_then(|slot| slot.get())
    }

    /// Whether a settled peer exists under this identifier
    pub fn has_peer(&self, id: &PeerId) -> bool {
        self.peer(id).is_some()
    }

    // -- Events --

    /// Subscribe to network events
    pub fn subscribe(&self) -> broadcast::Receiver<NetworkEvent<P>> {
        self.inner.events.subscribe()
    }

    /// Network events as an async stream
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = NetworkEvent<P>> + Send>> {
        into_stream(self.subscribe())
    }

    // -- Internals --

    fn register_peer(graph: &mut PeerGraph<P>, id: PeerId) -> Registration<P> {
        match graph.node(&id) {
            Some(slot) => Registration::Existing(slot.clone()),
            None => {
                let (slot, settler) = Slot::pending();
                graph.add_node(id, slot);
                Registration::Fresh(settler)
            }
        }
    }

    async fn resolve_registration(
        &self,
        id: PeerId,
        registration: Registration<P>,
    ) -> Result<P, NetworkError> {
        match registration {
            Registration::Existing(slot) => slot.wait().await,
            Registration::Fresh(settler) => self.create_peer(id, settler).await,
        }
    }

    async fn create_peer(&self, id: PeerId, settler: SlotSettler<P>) -> Result<P, NetworkError> {
        debug!(peer = %id, "creating peer");
        let created = self
            .bounded(self.inner.config.create_peer.create_peer(id))
            .await
            .and_then(|peer| {
                if peer.id() == id {
                    Ok(peer)
                } else {
                    Err(NetworkError::MalformedPeer {
                        expected: id,
                        actual: peer.id(),
                    })
                }
            });
        match created {
            Ok(peer) => {
                settler.settle(peer.clone());
                self.inner.graph.lock().touch_node(&id);
                Ok(peer)
            }
            Err(err) => {
                warn!(peer = %id, error = %err, "peer creation failed");
                settler.fail(err.clone());
                self.inner.graph.lock().remove_node(&id);
                Err(err)
            }
        }
    }

    async fn open_channel(&self, from: &P, to: &P) -> Result<Arc<dyn Channel>, NetworkError> {
        let created = self
            .bounded(self.inner.config.create_channel.create_channel(from, to))
            .await?;
        let channel: Arc<dyn Channel> = match created {
            Some(channel) => Arc::from(channel),
            None => Arc::new(PassThrough::new()),
        };
        if channel.is_closed() {
            return Err(NetworkError::MalformedConnection);
        }
        Ok(channel)
    }

    /// Remove the edge once its channel reports closed, from either side
    fn watch_channel(&self, edge_id: EdgeId, link: Link<P>, channel: Arc<dyn Channel>) {
        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            channel.closed().await;
            if let Some(inner) = inner.upgrade() {
                if inner.graph.lock().remove_edge(edge_id).is_some() {
                    debug!(edge = ?edge_id, "channel closed, edge removed");
                }
            }
            link.mark_removed();
        });
    }

    /// Close a connection's channel and wait for its edge to be erased
    async fn sever(&self, link: Link<P>) {
        if let Ok(connection) = link.slot.wait().await {
            connection.channel.close().await;
        }
        link.removed().await;
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, NetworkError>>,
    ) -> Result<T, NetworkError> {
        match self.inner.config.creation_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .unwrap_or(Err(NetworkError::CreationTimeout)),
            None => fut.await,
        }
    }
}

impl<P: Peer> Clone for Network<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Republish graph changes as network events
///
/// Additions are announced after (and only if) their payload settles;
/// removals only for announced subjects; payload-update bookkeeping is
/// swallowed. Runs until the network is dropped.
async fn forward_events<P: Peer>(
    mut changes: mpsc::UnboundedReceiver<PeerGraphChange<P>>,
    events: broadcast::Sender<NetworkEvent<P>>,
) {
    let mut announced_peers: HashSet<PeerId> = HashSet::new();
    let mut announced_edges: HashSet<EdgeId> = HashSet::new();
    while let Some(change) = changes.recv().await {
        match change {
            GraphChange::NodeAdded { key, payload } => {
                if let Ok(peer) = payload.wait().await {
                    announced_peers.insert(key);
                    let _ = events.send(NetworkEvent::PeerAdded(peer));
                }
            }
            GraphChange::NodeRemoved { key, payload } => {
                if announced_peers.remove(&key) {
                    if let Some(peer) = payload.get() {
                        let _ = events.send(NetworkEvent::PeerDeleted(peer));
                    }
                }
            }
            GraphChange::EdgeAdded { id, payload, .. } => {
                if let Ok(connection) = payload.slot.wait().await {
                    announced_edges.insert(id);
                    let _ = events.send(NetworkEvent::ConnectionAdded(connection));
                }
            }
            GraphChange::EdgeRemoved { id, payload, .. } => {
                if announced_edges.remove(&id) {
                    if let Some(connection) = payload.slot.get() {
                        let _ = events.send(NetworkEvent::ConnectionDeleted(connection));
                    }
                }
            }
            GraphChange::PayloadUpdated(_) => {}
        }
    }
}
