//! Public landing page.
//!
//! Renders whatever is in the site state: the built-in defaults until the first fetch
//! lands, the stored rows afterwards, and every live change from then on.

use dioxus::prelude::*;
use store::images::{image_or_fallback, FALLBACK_IMAGE};
use store::{LoadMode, Metadata, Project};

use crate::cell::use_site;
use crate::icons::FaArrowUpRightFromSquare;
use crate::live::use_site_sync;
use crate::Icon;

#[component]
pub fn LandingPage() -> Element {
    use_site_sync(LoadMode::Display);
    let site = use_site();
    let (content, metadata, projects) = {
        let state = site.read();
        (
            state.content.clone(),
            state.metadata.clone(),
            state.projects.clone(),
        )
    };

    rsx! {
        SeoHead { metadata }

        main {
            class: "landing",

            section {
                class: "hero",
                h1 { class: "hero-text", "{content.hero_text}" }
                p { class: "intro-text", "{content.intro_text}" }
            }

            section {
                class: "work",
                p { class: "work-intro", "{content.work_intro}" }
                div {
                    class: "project-grid",
                    for project in projects {
                        ProjectCard { key: "{project.id}", project }
                    }
                }
            }

            section {
                class: "availability",
                p {
                    "{content.availability_text} "
                    a { href: "mailto:{content.email}", "{content.email}" }
                }
            }
        }
    }
}

/// Document head tags driven by the `metadata` row.
#[component]
pub fn SeoHead(metadata: Metadata) -> Element {
    let keywords = metadata.keywords_line();

    rsx! {
        document::Title { "{metadata.title}" }
        document::Meta { name: "description", content: "{metadata.description}" }
        if !keywords.is_empty() {
            document::Meta { name: "keywords", content: "{keywords}" }
        }
        if !metadata.author.is_empty() {
            document::Meta { name: "author", content: "{metadata.author}" }
        }
        document::Meta { property: "og:title", content: "{metadata.title}" }
        document::Meta { property: "og:description", content: "{metadata.description}" }
        if let Some(image) = metadata.og_image.as_ref().filter(|url| !url.is_empty()) {
            document::Meta { property: "og:image", content: "{image}" }
        }
        if !metadata.twitter_handle.is_empty() {
            document::Meta { name: "twitter:creator", content: "{metadata.twitter_handle}" }
        }
    }
}

/// Image that swaps to the placeholder when the reference is empty or fails to load.
#[component]
pub fn FallbackImage(src: String, alt: String) -> Element {
    let mut failed = use_signal(|| false);
    let shown = if failed() {
        FALLBACK_IMAGE.to_string()
    } else {
        image_or_fallback(&src).to_string()
    };

    rsx! {
        img {
            src: "{shown}",
            alt: "{alt}",
            loading: "lazy",
            onerror: move |_| failed.set(true),
        }
    }
}

#[component]
pub fn ProjectCard(project: Project) -> Element {
    rsx! {
        article {
            class: "project-card",
            FallbackImage {
                key: "{project.image_url}",
                src: project.image_url.clone(),
                alt: project.title.clone(),
            }
            div {
                class: "project-body",
                div {
                    class: "project-heading",
                    h3 { "{project.title}" }
                    span { class: "project-date", "{project.date}" }
                }
                p { "{project.description}" }
                div {
                    class: "project-links",
                    if !project.github_url.is_empty() {
                        a {
                            href: "{project.github_url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            "GitHub"
                        }
                    }
                    if !project.live_url.is_empty() {
                        a {
                            href: "{project.live_url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            "Live "
                            Icon { icon: FaArrowUpRightFromSquare, width: 12, height: 12 }
                        }
                    }
                }
            }
        }
    }
}
