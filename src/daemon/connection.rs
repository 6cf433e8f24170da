//! Write-once connection to the daemon control API

use ipfs_rpc::{ClientOptions, IpfsClient, RpcResult};
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

use super::rpc::DaemonRpc;
use crate::error::{RepoError, RepoResult};

/// Builds a handle bound to an endpoint. Called at most once per connection.
pub type Connector = dyn Fn(&str) -> RpcResult<Arc<dyn DaemonRpc>> + Send + Sync;

enum ConnectionState {
    Unconnected,
    Connected {
        endpoint: String,
        handle: Arc<dyn DaemonRpc>,
    },
}

/// Owns the single daemon handle shared by every repository operation.
///
/// The state moves from `Unconnected` to `Connected` on the first successful
/// [`initialize`](Self::initialize) and never goes back. No liveness check is
/// done here: an unreachable daemon shows up as a transport failure on the
/// first real call.
pub struct DaemonConnection {
    state: Mutex<ConnectionState>,
    connector: Box<Connector>,
}

impl std::fmt::Debug for DaemonConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonConnection")
            .field("endpoint", &self.endpoint())
            .finish()
    }
}

impl DaemonConnection {
    /// Connection whose handle is an HTTP client for the control API.
    pub fn new(options: ClientOptions) -> Self {
        Self::with_connector(move |endpoint| {
            let client = IpfsClient::with_options(endpoint, options.clone())?;
            Ok(Arc::new(client) as Arc<dyn DaemonRpc>)
        })
    }

    pub fn with_connector<F>(connector: F) -> Self
    where
        F: Fn(&str) -> RpcResult<Arc<dyn DaemonRpc>> + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(ConnectionState::Unconnected),
            connector: Box::new(connector),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionState> {
        // The state is only ever swapped whole, so a poisoned guard is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Bind the handle to `endpoint`, or return the existing one untouched.
    pub fn initialize(&self, endpoint: &str) -> RepoResult<Arc<dyn DaemonRpc>> {
        let mut state = self.lock();
        if let ConnectionState::Connected {
            endpoint: bound,
            handle,
        } = &*state
        {
            if bound != endpoint {
                warn!(
                    "daemon already bound to {}, ignoring new endpoint {}",
                    bound, endpoint
                );
            }
            return Ok(handle.clone());
        }

        let handle = (self.connector)(endpoint).map_err(RepoError::InvalidEndpoint)?;
        info!("daemon connection bound to {}", endpoint);
        *state = ConnectionState::Connected {
            endpoint: endpoint.to_string(),
            handle: handle.clone(),
        };
        Ok(handle)
    }

    pub fn is_available(&self) -> bool {
        matches!(&*self.lock(), ConnectionState::Connected { .. })
    }

    /// The daemon handle, or `DaemonUnavailable` before initialization.
    pub fn handle(&self) -> RepoResult<Arc<dyn DaemonRpc>> {
        match &*self.lock() {
            ConnectionState::Connected { handle, .. } => Ok(handle.clone()),
            ConnectionState::Unconnected => Err(RepoError::DaemonUnavailable),
        }
    }

    pub fn endpoint(&self) -> Option<String> {
        match &*self.lock() {
            ConnectionState::Connected { endpoint, .. } => Some(endpoint.clone()),
            ConnectionState::Unconnected => None,
        }
    }
}
