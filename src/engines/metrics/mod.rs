pub mod distance;

pub use distance::{cosine_similarity, dot, euclidean, norm, rmse};
