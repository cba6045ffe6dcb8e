//! Index page rendering.

/// Render the landing page: a heading and an image, centered on screen.
///
/// Values are interpolated as-is, without HTML escaping. Config validation
/// keeps quotes and angle brackets out of the image name.
pub fn render_index_html(heading: &str, image_src: &str) -> String {
    format!(
        r#"<html>
    <head>
        <title>Welcome</title>
        <style>
            body {{
                text-align: center;
                display: flex;
                flex-direction: column;
                justify-content: center;
                align-items: center;
                height: 100vh;
                margin: 0;
            }}
            img {{
                width: 400px;
            }}
        </style>
    </head>
    <body>
        <h1>{heading}</h1>
        <img src="{image_src}" alt="Sallam Image">
    </body>
</html>"#
    )
}
