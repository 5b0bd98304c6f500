use wvdi_core::service::ResourceService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the service only holds an `Arc` to its store).
#[derive(Clone)]
pub struct AppState {
    /// Resource query service over the configured backing store.
    pub service: ResourceService,
}
