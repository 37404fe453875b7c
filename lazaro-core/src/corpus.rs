//! # Corpus Espanhol com Anotações BIO de Empréstimos
//!
//! Corpus pequeno de sentenças jornalísticas em espanhol, anotadas
//! manualmente no formato BIO para os dois tipos de empréstimo:
//!
//! - `B-ENG`/`I-ENG`: anglicismos ("look", "machine learning")
//! - `B-OTHER`/`I-OTHER`: empréstimos de outras línguas ("anime", "prêt-à-porter")
//! - `O`: vocabulário patrimonial
//!
//! Serve ao refino do modelo padrão e às demonstrações. Os domínios seguem
//! os contextos onde anglicismos mais aparecem na imprensa: moda,
//! tecnologia, entretenimento, gastronomia e esportes.

/// Uma sentença anotada no formato BIO.
pub struct AnnotatedSentence {
    /// O texto completo da sentença.
    pub text: &'static str,
    /// Domínio temático.
    pub domain: &'static str,
    /// Pares `(palavra, tag_BIO)`.
    /// Exemplo: `[("look", "B-ENG"), ("sencillo", "O")]`
    pub annotations: &'static [(&'static str, &'static str)],
}

/// Retorna o corpus anotado completo.
pub fn get_corpus() -> Vec<AnnotatedSentence> {
    vec![
        // ===== MODA =====
        AnnotatedSentence {
            text: "Inspírate con este look sencillo para la primavera.",
            domain: "moda",
            annotations: &[
                ("Inspírate", "O"), ("con", "O"), ("este", "O"), ("look", "B-ENG"),
                ("sencillo", "O"), ("para", "O"), ("la", "O"), ("primavera", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "La revista presentó la colección de prêt-à-porter de la temporada.",
            domain: "moda",
            annotations: &[
                ("La", "O"), ("revista", "O"), ("presentó", "O"), ("la", "O"),
                ("colección", "O"), ("de", "O"), ("prêt-à-porter", "B-OTHER"),
                ("de", "O"), ("la", "O"), ("temporada", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "El mundo del fashion vive una primavera de estilos retro.",
            domain: "moda",
            annotations: &[
                ("El", "O"), ("mundo", "O"), ("del", "O"), ("fashion", "B-ENG"),
                ("vive", "O"), ("una", "O"), ("primavera", "O"), ("de", "O"),
                ("estilos", "O"), ("retro", "O"), (".", "O"),
            ],
        },

        // ===== TECNOLOGÍA =====
        AnnotatedSentence {
            text: "La 'app' de 'machine learning' mejora cada semana.",
            domain: "tecnología",
            annotations: &[
                ("La", "O"), ("'", "O"), ("app", "B-ENG"), ("'", "O"), ("de", "O"),
                ("'", "O"), ("machine", "B-ENG"), ("learning", "I-ENG"), ("'", "O"),
                ("mejora", "O"), ("cada", "O"), ("semana", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Las empresas apuestan por el big data y el cloud para crecer.",
            domain: "tecnología",
            annotations: &[
                ("Las", "O"), ("empresas", "O"), ("apuestan", "O"), ("por", "O"),
                ("el", "O"), ("big", "B-ENG"), ("data", "I-ENG"), ("y", "O"),
                ("el", "O"), ("cloud", "B-ENG"), ("para", "O"), ("crecer", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "El software libre gana terreno frente al hardware propietario.",
            domain: "tecnología",
            annotations: &[
                ("El", "O"), ("software", "B-ENG"), ("libre", "O"), ("gana", "O"),
                ("terreno", "O"), ("frente", "O"), ("al", "O"), ("hardware", "B-ENG"),
                ("propietario", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Una startup lanzó una campaña de crowdfunding para su smartphone.",
            domain: "tecnología",
            annotations: &[
                ("Una", "O"), ("startup", "B-ENG"), ("lanzó", "O"), ("una", "O"),
                ("campaña", "O"), ("de", "O"), ("crowdfunding", "B-ENG"), ("para", "O"),
                ("su", "O"), ("smartphone", "B-ENG"), (".", "O"),
            ],
        },

        // ===== ENTRETENIMIENTO =====
        AnnotatedSentence {
            text: "El reality del prime time sigue batiendo récords de audiencia.",
            domain: "entretenimiento",
            annotations: &[
                ("El", "O"), ("reality", "B-ENG"), ("del", "O"), ("prime", "B-ENG"),
                ("time", "I-ENG"), ("sigue", "O"), ("batiendo", "O"), ("récords", "O"),
                ("de", "O"), ("audiencia", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Mi serie de anime favorita estrena temporada en streaming.",
            domain: "entretenimiento",
            annotations: &[
                ("Mi", "O"), ("serie", "O"), ("de", "O"), ("anime", "B-OTHER"),
                ("favorita", "O"), ("estrena", "O"), ("temporada", "O"), ("en", "O"),
                ("streaming", "B-ENG"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "El cantante cuidó cada detalle del show sin ningún spoiler.",
            domain: "entretenimiento",
            annotations: &[
                ("El", "O"), ("cantante", "O"), ("cuidó", "O"), ("cada", "O"),
                ("detalle", "O"), ("del", "O"), ("show", "B-ENG"), ("sin", "O"),
                ("ningún", "O"), ("spoiler", "B-ENG"), (".", "O"),
            ],
        },

        // ===== GASTRONOMÍA =====
        AnnotatedSentence {
            text: "El chef sirvió sushi y un poco de foie gras.",
            domain: "gastronomía",
            annotations: &[
                ("El", "O"), ("chef", "B-OTHER"), ("sirvió", "O"), ("sushi", "B-OTHER"),
                ("y", "O"), ("un", "O"), ("poco", "O"), ("de", "O"),
                ("foie", "B-OTHER"), ("gras", "I-OTHER"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "El servicio de catering incluye delivery a toda la ciudad.",
            domain: "gastronomía",
            annotations: &[
                ("El", "O"), ("servicio", "O"), ("de", "O"), ("catering", "B-ENG"),
                ("incluye", "O"), ("delivery", "B-ENG"), ("a", "O"), ("toda", "O"),
                ("la", "O"), ("ciudad", "O"), (".", "O"),
            ],
        },

        // ===== DEPORTE =====
        AnnotatedSentence {
            text: "El running y el crossfit dominan el ranking de actividades.",
            domain: "deporte",
            annotations: &[
                ("El", "O"), ("running", "B-ENG"), ("y", "O"), ("el", "O"),
                ("crossfit", "B-ENG"), ("dominan", "O"), ("el", "O"),
                ("ranking", "B-ENG"), ("de", "O"), ("actividades", "O"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "El coach preparó un training especial para el equipo.",
            domain: "deporte",
            annotations: &[
                ("El", "O"), ("coach", "B-ENG"), ("preparó", "O"), ("un", "O"),
                ("training", "B-ENG"), ("especial", "O"), ("para", "O"), ("el", "O"),
                ("equipo", "O"), (".", "O"),
            ],
        },

        // ===== NEGOCIOS =====
        AnnotatedSentence {
            text: "La empresa busca un community manager con experiencia en marketing.",
            domain: "negocios",
            annotations: &[
                ("La", "O"), ("empresa", "O"), ("busca", "O"), ("un", "O"),
                ("community", "B-ENG"), ("manager", "I-ENG"), ("con", "O"),
                ("experiencia", "O"), ("en", "O"), ("marketing", "B-ENG"), (".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "El smart working llegó para quedarse en las oficinas españolas.",
            domain: "negocios",
            annotations: &[
                ("El", "O"), ("smart", "B-ENG"), ("working", "I-ENG"), ("llegó", "O"),
                ("para", "O"), ("quedarse", "O"), ("en", "O"), ("las", "O"),
                ("oficinas", "O"), ("españolas", "O"), (".", "O"),
            ],
        },
    ]
}

/// Textos de demonstração sem anotação, por domínio (para a interface web).
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "tecnología",
            "La 'app' de 'machine learning' fue un éxito en el festival de 'anime'",
        ),
        ("moda", "Inspírate con este look sencillo para la primavera."),
        ("redes", "El influencer subió un selfie desde el gym."),
        ("gastronomía", "Pidieron sushi por delivery después del show."),
    ]
}
