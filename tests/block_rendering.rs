//! Block templates rendered through a live traversal context.

mod common;

use common::*;
use notion2markdown::model::*;
use notion2markdown::{render_blocks, PageScope};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

async fn render(source: MemorySource, fetcher: MemoryFetcher, blocks: Vec<Block>) -> String {
    let dir = TempDir::new().unwrap();
    let ctx = context(Arc::new(source), Arc::new(fetcher));
    let scope = ctx
        .enter_page_scope(dir.path().join("page_00000001"), 0)
        .unwrap();
    render_blocks(&blocks, &ctx, &scope).await.unwrap()
}

fn heading(n: u32, level: u8, content: &str) -> Block {
    Block::Heading(HeadingBlock {
        common: BlockCommon::new(id(n)),
        level,
        content: TextBlockContent::new(text(content)),
    })
}

fn to_do(n: u32, content: &str, checked: bool) -> Block {
    Block::ToDo(ToDoBlock {
        common: BlockCommon::new(id(n)),
        content: TextBlockContent::new(text(content)),
        checked,
    })
}

#[tokio::test]
async fn test_numbered_list_counts_consecutive_items() {
    let blocks = vec![
        numbered(10, "first"),
        numbered(11, "second"),
        paragraph(12, "break"),
        numbered(13, "again"),
    ];

    let markdown = render(MemorySource::new(), MemoryFetcher::new(), blocks).await;

    assert_eq!(markdown, "1. first\n2. second\n\nbreak\n\n1. again");
}

#[tokio::test]
async fn test_list_children_are_indented() {
    let mut parent = bulleted(10, "parent");
    if let Block::BulletedListItem(item) = &mut parent {
        item.common.has_children = true;
    }
    let source = MemorySource::new().with_children(
        10,
        vec![bulleted(11, "child"), to_do(12, "task", true)],
    );

    let markdown = render(
        source,
        MemoryFetcher::new(),
        vec![parent, bulleted(13, "sibling"), to_do(14, "open", false)],
    )
    .await;

    assert_eq!(
        markdown,
        "- parent\n  - child\n  - [x] task\n- sibling\n- [ ] open"
    );
}

#[tokio::test]
async fn test_headings_quotes_and_callouts() {
    let blocks = vec![
        heading(10, 1, "Title"),
        heading(11, 3, "Small"),
        Block::Quote(QuoteBlock {
            common: BlockCommon::new(id(12)),
            content: TextBlockContent::new(text("line one\nline two")),
        }),
        Block::Callout(CalloutBlock {
            common: BlockCommon::new(id(13)),
            emoji: Some("💡".to_string()),
            content: TextBlockContent::new(text("Remember")),
        }),
        Block::Divider(DividerBlock {
            common: BlockCommon::new(id(14)),
        }),
    ];

    let markdown = render(MemorySource::new(), MemoryFetcher::new(), blocks).await;

    assert_eq!(
        markdown,
        "# Title\n\n### Small\n\n> line one\n> line two\n\n> 💡 Remember\n\n---"
    );
}

#[tokio::test]
async fn test_table_uses_first_row_as_header() {
    let source = MemorySource::new().with_paged_children(
        10,
        vec![
            vec![table_row(11, &["Name", "Owner"]), table_row(12, &["Docs", ""])],
            vec![table_row(13, &["Ship | Deploy", "Ops"])],
        ],
    );

    let markdown = render(source, MemoryFetcher::new(), vec![table(10, 2)]).await;

    assert_eq!(
        markdown,
        "| Name | Owner |\n| --- | --- |\n| Docs |   |\n| Ship \\| Deploy | Ops |"
    );
}

#[tokio::test]
async fn test_code_equation_and_links() {
    let blocks = vec![
        Block::Code(CodeBlock {
            common: BlockCommon::new(id(10)),
            language: "python".to_string(),
            caption: vec![],
            content: TextBlockContent::new(text("print('hi')")),
        }),
        Block::Equation(EquationBlock {
            common: BlockCommon::new(id(11)),
            expression: "E = mc^2".to_string(),
        }),
        Block::Bookmark(BookmarkBlock {
            common: BlockCommon::new(id(12)),
            url: "https://example.com".to_string(),
            caption: vec![],
        }),
        Block::Embed(EmbedBlock {
            common: BlockCommon::new(id(13)),
            url: "https://maps.test/x".to_string(),
        }),
        Block::Video(MediaBlock {
            common: BlockCommon::new(id(14)),
            source: FileObject::External {
                url: "https://video.test/watch?v=1".to_string(),
            },
            caption: vec![],
            name: None,
        }),
    ];

    let markdown = render(MemorySource::new(), MemoryFetcher::new(), blocks).await;

    assert_eq!(
        markdown,
        "```python\nprint('hi')\n```\n\n$$\nE = mc^2\n$$\n\n\
         [https://example.com](https://example.com)\n\n\
         [https://maps.test/x](https://maps.test/x)\n\n\
         [https://video.test/watch?v=1](https://video.test/watch?v=1)"
    );
}

#[tokio::test]
async fn test_child_page_link_uses_target_slug() {
    let markdown = render(
        MemorySource::new(),
        MemoryFetcher::new(),
        vec![child_page(2, "Meeting Notes"), child_page(3, "")],
    )
    .await;

    assert_eq!(
        markdown,
        "[Meeting Notes](./meeting-notes_00000002/index.md)\n\n\
         [Untitled](./untitled_00000003/index.md)"
    );
}

#[tokio::test]
async fn test_file_block_label_falls_back_to_url_name() {
    let url = "https://files.test/uploads/spec.pdf";
    let block = Block::Pdf(MediaBlock {
        common: BlockCommon::new(id(10)),
        source: FileObject::Hosted {
            url: url.to_string(),
            expiry_time: None,
        },
        caption: vec![],
        name: None,
    });
    let fetcher = MemoryFetcher::new().with_body(url, b"%PDF-1.7");

    let markdown = render(MemorySource::new(), fetcher, vec![block]).await;

    let name = notion2markdown::assets::asset_file_name(b"%PDF-1.7", url);
    assert_eq!(markdown, format!("[spec.pdf](assets/{})", name));
}

#[tokio::test]
async fn test_columns_render_children_inline() {
    let column_list = Block::ColumnList(ContainerBlock {
        common: BlockCommon::new(id(10)).with_children(),
    });
    let source = MemorySource::new()
        .with_children(
            10,
            vec![
                Block::Column(ContainerBlock {
                    common: BlockCommon::new(id(11)).with_children(),
                }),
                Block::Column(ContainerBlock {
                    common: BlockCommon::new(id(12)).with_children(),
                }),
            ],
        )
        .with_children(11, vec![paragraph(13, "left")])
        .with_children(12, vec![paragraph(14, "right")]);

    let markdown = render(source, MemoryFetcher::new(), vec![column_list]).await;

    assert_eq!(markdown, "left\n\nright");
}

#[tokio::test]
async fn test_empty_paragraphs_are_dropped() {
    let blocks = vec![
        paragraph(10, "a"),
        paragraph(11, ""),
        paragraph(12, "b"),
    ];

    let markdown = render(MemorySource::new(), MemoryFetcher::new(), blocks).await;

    assert_eq!(markdown, "a\n\nb");
}

#[test]
fn test_page_scope_puts_assets_under_page() {
    let scope = PageScope::new("out/page_00000001".into(), 2);
    assert_eq!(scope.assets_dir, std::path::PathBuf::from("out/page_00000001/assets"));
    assert_eq!(scope.depth, 2);
}
