//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx3d, Offset3d};

pub use crate::{extract, extract_roi, TextureSettings};
pub use crate::{ExtractError, ExtractResult};

pub use crate::data::morph_3d::{DistanceMap, DistanceMetric, Zone, ZoneMap};
pub use crate::data::Roi;

pub use crate::aggregate::{Aggregation, NormalizedMatrix};
pub use crate::features::{all_feature_names, Family, FeatureMap};
pub use crate::matrix::{CountMatrix, DependenceRule, NgldmBuilder, NgtdmTable};

pub use crate::consts::{DEFAULT_ALPHA, DEFAULT_DISTANCE, DIRECTION_COUNT};
pub use crate::neighbour::DIRECTIONS;
