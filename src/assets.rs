/// Image decoding into premultiplied pixels.
pub mod decode;
/// Image loaders and concurrent scene image loading.
pub mod loader;
