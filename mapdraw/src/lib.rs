pub mod model;
pub mod color;
pub mod config;
pub mod error;
pub mod geojson;
pub mod listener;
pub mod plots;
pub mod search;
pub mod session;
pub mod storage;
pub mod surface;
pub mod timers;
pub mod geometry {
    pub mod geodesy;
    pub mod limits;
    pub mod tolerance;
}
pub mod boundaries {
    pub mod detector;
    pub mod manager;
    pub mod registry;
}
pub mod draw {
    pub mod collection;
    pub mod config;
    pub mod label;
    pub mod manager;
}

pub use boundaries::manager::{BoundaryManager, Phase};
pub use boundaries::registry::{BoundaryDefinition, BoundaryName, BoundaryRegistry};
pub use color::{DrawColor, ShapeStyle};
pub use config::{CompletionMode, MapConfig, SearchConfig, SessionConfig, TransitionConfig};
pub use draw::collection::{DrawnCollection, DrawnFeature};
pub use draw::config::{DrawConfig, DrawControl, DrawLocale};
pub use draw::manager::{DrawManager, ImportReport};
pub use error::{MapError, Result, StoreError, SurfaceError};
pub use geojson::{FeatureCollection, GeoFeature};
pub use listener::{MapListener, NoopListener, Notice, RecordingListener};
pub use model::{FeatureId, LatLng, LatLngBounds, Shape, ShapeKind};
pub use search::{SearchEngine, SearchState, Visual};
pub use session::MapSession;
pub use storage::{DrawingStore, KeyValueStore, MemoryStore, STORAGE_KEY};
pub use surface::{EventKind, HeadlessSurface, MapEvent, MapSurface};
