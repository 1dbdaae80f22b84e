#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

pub const CHAPTER_XHTML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Chapter 1</title></head>
<body><h1 id="s1">Chapter 1</h1><p>Hello world.</p><h2 id="s2">Part two</h2></body>
</html>"#;

/// Bytes standing in for a JPEG; only the entry name matters to the engine.
pub const COVER_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-payload";

/// Write a zip archive with `mimetype` stored first, then `entries` in order.
pub fn write_epub(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).expect("start mimetype");
    zip.write_all(b"application/epub+zip").expect("write mimetype");
    for (entry, data) in entries {
        zip.start_file(*entry, deflated).expect("start entry");
        zip.write_all(data).expect("write entry");
    }

    let bytes = zip.finish().expect("finish zip").into_inner();
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write epub");
    path
}

/// The end-to-end fixture: container pointing at `OEBPS/content.opf`, an
/// EPUB 3 cover-image item and a single spine item.
pub fn minimal_v3(dir: &Path) -> PathBuf {
    let opf = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:isbn:9780000000002</dc:identifier>
    <dc:title>Minimal Book</dc:title>
    <dc:language>en</dc:language>
    <dc:creator>Test Author</dc:creator>
  </metadata>
  <manifest>
    <item id="cover" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>
    <item id="c1" href="text/chap1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="c1"/>
  </spine>
</package>"#;

    write_epub(
        dir,
        "minimal-v3.epub",
        &[
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/images/cover.jpg", COVER_BYTES),
            ("OEBPS/text/chap1.xhtml", CHAPTER_XHTML.as_bytes()),
        ],
    )
}

/// EPUB 3 with a nav document in a subdirectory, an NCX that must be ignored
/// and a repeated spine item.
pub fn nav_v3(dir: &Path) -> PathBuf {
    let opf = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Navigable</dc:title>
    <dc:language>fr</dc:language>
  </metadata>
  <manifest>
    <item id="nav" href="nav/toc.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="c1" href="text/chap1.xhtml" media-type="application/xhtml+xml"/>
    <item id="c2" href="text/chap2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="c2"/>
    <itemref idref="c1"/>
    <itemref idref="c2"/>
  </spine>
</package>"#;

    let nav = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Contents</title></head>
<body>
  <nav epub:type="landmarks"><ol><li><a href="../text/chap2.xhtml">Start</a></li></ol></nav>
  <nav epub:type="toc" id="toc">
    <ol>
      <li><a href="../text/chap1.xhtml">One</a>
        <ol><li><a href="../text/chap1.xhtml#s2">One, part two</a></li></ol>
      </li>
      <li><a href="../text/chap2.xhtml">Two</a></li>
      <li><a href="../text/chap1.xhtml">One again</a></li>
    </ol>
  </nav>
</body>
</html>"#;

    let ncx = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="np1"><navLabel><text>NCX only</text></navLabel><content src="text/chap2.xhtml"/></navPoint>
  </navMap>
</ncx>"#;

    write_epub(
        dir,
        "nav-v3.epub",
        &[
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/nav/toc.xhtml", nav.as_bytes()),
            ("OEBPS/toc.ncx", ncx.as_bytes()),
            ("OEBPS/text/chap1.xhtml", CHAPTER_XHTML.as_bytes()),
            ("OEBPS/text/chap2.xhtml", CHAPTER_XHTML.as_bytes()),
        ],
    )
}

/// EPUB 2 with an NCX and no nav item; the OPF sits at the archive root and
/// uses the EPUB 2 cover meta.
pub fn ncx_v2(dir: &Path) -> PathBuf {
    let container = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="package.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#;

    let opf = r#"<?xml version="1.0" encoding="UTF-8"?>
<opf:package xmlns:opf="http://www.idpf.org/2007/opf" version="2.0">
  <opf:metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Legacy Book</dc:title>
    <dc:creator>First</dc:creator>
    <dc:creator>Second</dc:creator>
    <dc:identifier>978-1-4028-9462-6</dc:identifier>
    <opf:meta name="cover" content="cover-pic"/>
  </opf:metadata>
  <opf:manifest>
    <opf:item id="toc" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <opf:item id="thumb" href="thumb.png" media-type="image/png"/>
    <opf:item id="cover-pic" href="art/front.jpg" media-type="image/jpeg"/>
    <opf:item id="p1" href="part1.html" media-type="text/html"/>
    <opf:item id="p2" href="part2.html" media-type="text/html"/>
  </opf:manifest>
  <opf:spine toc="toc">
    <opf:itemref idref="p1"/>
    <opf:itemref idref="p2"/>
  </opf:spine>
</opf:package>"#;

    let ncx = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head/>
  <docTitle><text>Legacy Book</text></docTitle>
  <navMap>
    <navPoint id="n1" playOrder="1">
      <navLabel><text>Part One</text></navLabel>
      <content src="part1.html"/>
    </navPoint>
    <navPoint id="n2" playOrder="2">
      <navLabel><text>Part Two</text></navLabel>
      <content src="part2.html#middle"/>
    </navPoint>
    <navPoint id="n3" playOrder="3">
      <navLabel><text>Part Two, again</text></navLabel>
      <content src="part2.html#end"/>
    </navPoint>
  </navMap>
</ncx>"#;

    write_epub(
        dir,
        "ncx-v2.epub",
        &[
            ("META-INF/container.xml", container.as_bytes()),
            ("package.opf", opf.as_bytes()),
            ("toc.ncx", ncx.as_bytes()),
            ("thumb.png", b"png"),
            ("art/front.jpg", COVER_BYTES),
            ("part1.html", b"<html><body><p>one</p></body></html>"),
            ("part2.html", b"<html><body><p>two</p></body></html>"),
        ],
    )
}

/// A cover-image item plus an EPUB 2 cover meta pointing at another image.
pub fn cover_priority(dir: &Path) -> PathBuf {
    let opf = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Two Covers</dc:title>
    <meta name="cover" content="old-cover"/>
  </metadata>
  <manifest>
    <item id="old-cover" href="images/legacy.jpg" media-type="image/jpeg"/>
    <item id="c1" href="chap1.xhtml" media-type="application/xhtml+xml"/>
    <item id="new-cover" href="images/cover.png" media-type="image/png" properties="cover-image"/>
  </manifest>
  <spine><itemref idref="c1"/></spine>
</package>"#;

    write_epub(
        dir,
        "cover-priority.epub",
        &[
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/images/legacy.jpg", COVER_BYTES),
            ("OEBPS/images/cover.png", b"png"),
            ("OEBPS/chap1.xhtml", CHAPTER_XHTML.as_bytes()),
        ],
    )
}

/// No declared cover and no raster manifest item; the first chapter embeds
/// a GIF by relative path.
pub fn first_page_image(dir: &Path) -> PathBuf {
    let opf = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Picture Book</dc:title></metadata>
  <manifest>
    <item id="css" href="style.css" media-type="text/css"/>
    <item id="title" href="text/title.xhtml" media-type="application/xhtml+xml"/>
    <item id="art" href="images/page1.gif" media-type="image/gif"/>
  </manifest>
  <spine>
    <itemref idref="title"/>
  </spine>
</package>"#;

    let title = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<body><div class="full"><img alt="" src="../images/page1.gif"/></div></body>
</html>"#;

    write_epub(
        dir,
        "first-page.epub",
        &[
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/style.css", b"body{}"),
            ("OEBPS/text/title.xhtml", title.as_bytes()),
            ("OEBPS/images/page1.gif", b"GIF89a"),
        ],
    )
}

/// A publication with no images at all.
pub fn no_cover(dir: &Path) -> PathBuf {
    let opf = r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Plain</dc:title></metadata>
  <manifest><item id="c1" href="chap1.xhtml" media-type="application/xhtml+xml"/></manifest>
  <spine><itemref idref="c1"/></spine>
</package>"#;

    write_epub(
        dir,
        "no-cover.epub",
        &[
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/chap1.xhtml", b"<html><body><p>text only</p></body></html>"),
        ],
    )
}

pub fn missing_container(dir: &Path) -> PathBuf {
    write_epub(
        dir,
        "no-container.epub",
        &[("OEBPS/content.opf", b"<package/>")],
    )
}

pub fn missing_package_document(dir: &Path) -> PathBuf {
    write_epub(
        dir,
        "no-opf.epub",
        &[("META-INF/container.xml", CONTAINER_XML.as_bytes())],
    )
}

pub fn malformed_package_document(dir: &Path) -> PathBuf {
    write_epub(
        dir,
        "bad-opf.epub",
        &[
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            (
                "OEBPS/content.opf",
                b"<package><metadata><dc:title>Broken</metadata></package>",
            ),
        ],
    )
}

/// A temp dir holding one fixture. The `TempDir` must be kept alive.
pub fn fixture(build: fn(&Path) -> PathBuf) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("create temp dir");
    let path = build(tmp.path());
    (tmp, path)
}
