pub mod openai_compatible_images;

mod openai_images_common;
mod openai_like;

pub use openai_compatible_images::OpenAICompatibleImages;
