/// Built-in content registry: the site's courses and blog articles.
///
/// Sections and headings are expanded into their own items at startup. Their
/// href is `<parent href>#<slug>` and they inherit the parent's tags.
use site_common::text::slugify;

use crate::model::{ItemKind, SearchItem};

struct Document {
    title: &'static str,
    description: &'static str,
    href: &'static str,
    tags: &'static [&'static str],
    keywords: &'static [&'static str],
    /// Section titles for guides, heading titles for articles.
    parts: &'static [&'static str],
}

const GUIDES: &[Document] = &[
    Document {
        title: "React : les fondamentaux",
        description: "Composants, props, état et hooks : tout ce qu'il faut pour construire une interface avec React.",
        href: "/cours/react",
        tags: &["React", "JavaScript"],
        keywords: &["JSX", "composants", "hooks", "useState", "useEffect"],
        parts: &[
            "Composants et JSX",
            "Props et état",
            "Les hooks essentiels",
            "Gérer les effets de bord",
            "Listes et clés",
            "Formulaires contrôlés",
        ],
    },
    Document {
        title: "Next.js et les modes de rendu",
        description: "Comprendre où et quand une page est générée, du serveur jusqu'au navigateur.",
        href: "/cours/nextjs",
        tags: &["Next.js", "React", "Performance"],
        keywords: &["SSR", "SSG", "ISR", "CSR", "App Router", "hydratation"],
        parts: &[
            "Client-Side Rendering",
            "Server-Side Rendering",
            "Génération statique",
            "Régénération incrémentale",
            "L'hydratation expliquée",
            "Server Components",
        ],
    },
    Document {
        title: "TypeScript pour les développeurs JavaScript",
        description: "Typer progressivement une base de code existante sans perdre en productivité.",
        href: "/cours/typescript",
        tags: &["TypeScript", "JavaScript"],
        keywords: &["types", "génériques", "interfaces", "narrowing"],
        parts: &[
            "Types de base",
            "Interfaces et alias",
            "Les génériques",
            "Affiner les types avec le narrowing",
            "Types utilitaires",
        ],
    },
    Document {
        title: "Tester une application front-end",
        description: "Une stratégie de tests réaliste : unitaires, composants et parcours complets.",
        href: "/cours/tests",
        tags: &["Tests", "Qualité"],
        keywords: &["Vitest", "Testing Library", "mocks", "Playwright"],
        parts: &[
            "Tests unitaires avec Vitest",
            "Tester des composants avec Testing Library",
            "Mocker les appels réseau",
            "Tests end-to-end avec Playwright",
        ],
    },
    Document {
        title: "Architecture hexagonale",
        description: "Isoler le métier de l'infrastructure avec des ports et des adaptateurs.",
        href: "/cours/architecture-hexagonale",
        tags: &["Architecture", "Clean Code"],
        keywords: &["ports", "adaptateurs", "use case", "domaine"],
        parts: &[
            "Le domaine au centre",
            "Ports et adaptateurs",
            "Écrire un use case",
            "Tester sans infrastructure",
        ],
    },
    Document {
        title: "Git au quotidien",
        description: "Les commandes et les habitudes qui évitent de perdre du travail.",
        href: "/cours/git",
        tags: &["Git", "Outils"],
        keywords: &["branches", "rebase", "merge", "commit"],
        parts: &["Branches et merge", "Rebase interactif", "Résoudre un conflit"],
    },
];

const ARTICLES: &[Document] = &[
    Document {
        title: "useMemo, useCallback et React.memo",
        description: "Quand la mémoïsation accélère vraiment un composant, et quand elle ne fait qu'ajouter du bruit.",
        href: "/blog/usememo-usecallback-react-memo",
        tags: &["React", "Performance"],
        keywords: &["useMemo", "useCallback", "memo", "mémoïsation"],
        parts: &[
            "Le coût d'un re-rendu",
            "Mémoriser un calcul coûteux",
            "L'égalité référentielle des callbacks",
            "React.memo sur les composants",
            "Mesurer avant d'optimiser",
        ],
    },
    Document {
        title: "Le TDD appliqué au front-end",
        description: "Écrire le test d'abord, même pour des composants React.",
        href: "/blog/tdd-front-end",
        tags: &["Tests", "TDD", "React"],
        keywords: &["red green refactor", "Vitest", "Testing Library"],
        parts: &[
            "Le cycle red, green, refactor",
            "Pourquoi écrire le test d'abord ?",
            "Un premier composant piloté par les tests",
            "Les pièges courants",
        ],
    },
    Document {
        title: "Afficher 10 000 lignes sans ramer",
        description: "Virtualiser une longue liste pour ne rendre que ce qui est visible.",
        href: "/blog/virtualisation-listes",
        tags: &["React", "Performance"],
        keywords: &["virtualisation", "react-window", "listes"],
        parts: &[
            "Pourquoi le DOM sature",
            "Le principe de la fenêtre glissante",
            "Mise en place avec react-window",
        ],
    },
    Document {
        title: "SSR, SSG ou ISR : comment choisir ?",
        description: "Comparer les modes de rendu selon la fraîcheur des données et le coût serveur.",
        href: "/blog/choisir-mode-de-rendu",
        tags: &["Next.js", "Performance"],
        keywords: &["hydratation", "cache", "CDN", "TTFB"],
        parts: &[
            "Le coût de l'hydratation",
            "Quand le cache change tout",
            "Arbre de décision",
        ],
    },
    Document {
        title: "Ports et adaptateurs en TypeScript",
        description: "Un exemple complet d'architecture hexagonale, du use case à l'adaptateur HTTP.",
        href: "/blog/ports-adaptateurs-typescript",
        tags: &["Architecture", "TypeScript"],
        keywords: &["hexagonale", "use case", "injection de dépendances"],
        parts: &[
            "Définir un port",
            "Brancher un adaptateur",
            "Tester le use case en isolation",
        ],
    },
    Document {
        title: "Les commits conventionnels",
        description: "Un format de message qui rend l'historique lisible et le changelog automatique.",
        href: "/blog/commits-conventionnels",
        tags: &["Git"],
        keywords: &["conventional commits", "changelog", "semver"],
        parts: &["Le format type(scope): message", "Générer un changelog"],
    },
    Document {
        title: "Accessibilité : les bases pour les formulaires",
        description: "Des formulaires utilisables au clavier et au lecteur d'écran.",
        href: "/blog/accessibilite-formulaires",
        tags: &["Accessibilité", "HTML"],
        keywords: &["ARIA", "labels", "a11y", "front-end"],
        parts: &[
            "Associer labels et champs",
            "Annoncer les erreurs",
            "Naviguer au clavier",
        ],
    },
];

/// The built-in registry, grouped by kind and in display order.
pub fn builtin_items() -> Vec<SearchItem> {
    let mut items = Vec::new();
    items.extend(GUIDES.iter().map(|d| document_item(d, ItemKind::Guide)));
    items.extend(GUIDES.iter().flat_map(|d| part_items(d, ItemKind::GuideSection)));
    items.extend(ARTICLES.iter().map(|d| document_item(d, ItemKind::Article)));
    items.extend(ARTICLES.iter().flat_map(|d| part_items(d, ItemKind::ArticleHeading)));
    items
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn document_item(doc: &Document, kind: ItemKind) -> SearchItem {
    SearchItem {
        kind,
        title: doc.title.to_string(),
        description: Some(doc.description.to_string()),
        href: doc.href.to_string(),
        tags: owned(doc.tags),
        parent_title: None,
        keywords: owned(doc.keywords),
    }
}

fn part_items(doc: &'static Document, kind: ItemKind) -> impl Iterator<Item = SearchItem> {
    doc.parts.iter().map(move |part| SearchItem {
        kind,
        title: part.to_string(),
        description: None,
        href: format!("{}#{}", doc.href, slugify(part)),
        tags: owned(doc.tags),
        parent_title: Some(doc.title.to_string()),
        keywords: vec![],
    })
}
