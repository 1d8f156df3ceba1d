use crate::options::Options;

pub const BASE_URL: &str = "https://source.unsplash.com";

/// Builds the request URL for a nature wallpaper sized to the merged options.
///
/// The category endpoint serves a random image for the requested dimensions
/// and does not honor selection parameters, so the URL carries only the size.
/// The computed parameters stay available through [`grayscale_segment`] and
/// [`selection_params`] so callers can show the user what was asked for.
pub fn build_url(options: &Options) -> String {
    format!(
        "{}/category/nature/{}x{}",
        BASE_URL, options.width, options.height
    )
}

/// Path segment the grayscale flag would select.
pub fn grayscale_segment(options: &Options) -> &'static str {
    if options.grayscale {
        "g/"
    } else {
        ""
    }
}

/// Query tokens derived from the selection flags, in `key=value` or bare
/// keyword form.
pub fn selection_params(options: &Options) -> Vec<String> {
    let mut params = Vec::new();

    if let Some(image) = &options.image {
        params.push(format!("image={}", image));
    }
    if let Some(gravity) = options.gravity {
        params.push(format!("gravity={}", gravity));
    }
    if options.random {
        params.push("random".to_string());
    }
    if options.blur {
        params.push("blur".to_string());
    }

    params
}
