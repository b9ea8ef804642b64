//! Styled HTML page wrapping the converted rewrite

pub const FOOTER_TEXT: &str = "Generated by Science Simplifier Tool @ sst.mbiri.net";

const STYLE: &str = r#"        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 900px;
            margin: 0 auto;
            padding: 40px 20px;
            line-height: 1.8;
            color: #333;
            background-color: #f5f5f5;
        }
        .container {
            background-color: white;
            padding: 40px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 {
            color: #2c3e50;
            border-bottom: 3px solid #3498db;
            padding-bottom: 10px;
            margin-bottom: 30px;
            font-size: 2.2em;
        }
        h2 {
            color: #34495e;
            margin-top: 40px;
            margin-bottom: 20px;
            padding-bottom: 10px;
            border-bottom: 2px solid #ecf0f1;
            font-size: 1.6em;
        }
        h3 {
            color: #2c3e50;
            margin-top: 25px;
            margin-bottom: 15px;
            font-size: 1.3em;
        }
        .metadata {
            color: #7f8c8d;
            font-size: 0.9em;
            margin-bottom: 30px;
            padding: 20px;
            background-color: #ecf0f1;
            border-radius: 4px;
            border-left: 4px solid #3498db;
        }
        .original-paper-link {
            margin-bottom: 30px;
            padding: 15px;
            background-color: #e8f4f8;
            border-radius: 4px;
            border-left: 4px solid #3498db;
        }
        .original-paper-link a {
            color: #2980b9;
            text-decoration: none;
            font-weight: bold;
        }
        .original-paper-link a:hover {
            text-decoration: underline;
        }
        .content {
            word-wrap: break-word;
        }
        .content p {
            margin-bottom: 15px;
        }
        .footer {
            margin-top: 50px;
            padding-top: 20px;
            border-top: 1px solid #ddd;
            text-align: center;
            color: #7f8c8d;
            font-size: 0.9em;
        }
        strong {
            color: #2c3e50;
        }"#;

/// Values substituted into the page
pub struct PageContext<'a> {
    pub original_filename: &'a str,
    pub processed_at: &'a str,
    pub original_url: &'a str,
    pub content_html: &'a str,
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Simplified: {filename}</title>
    <style>
{style}
    </style>
</head>
<body>
    <div class="container">
        <h1>Science Simplifier Results</h1>
        <div class="metadata">
            <strong>Original Document:</strong> {filename}<br>
            <strong>Processed:</strong> {processed_at}
        </div>
        <div class="original-paper-link">
            <strong>📄 Original Paper:</strong>
            <a href="{original_url}" target="_blank">View Original Paper</a>
        </div>
        <div class="content">
{content}
        </div>
        <div class="footer">
            {footer}
        </div>
    </div>
</body>
</html>"#,
        filename = ctx.original_filename,
        style = STYLE,
        processed_at = ctx.processed_at,
        original_url = ctx.original_url,
        content = ctx.content_html,
        footer = FOOTER_TEXT,
    )
}
