//! Built-in data used when nothing usable is persisted.

use esf_types::{now_ms, Comment, ContentType, Exercise, Lesson, Post, PostContent, QuizQuestion, User, UserRole};

const QUESTIONS_PER_LESSON: usize = 10;

fn user(id: &str, name: &str, email: &str, role: UserRole, seed: &str, bio: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        role,
        avatar: format!("https://picsum.photos/seed/{seed}/200"),
        bio: bio.into(),
        completed_tests: None,
        completed_practices: None,
        completed_articles: None,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            "admin-1",
            "Diretor ESF",
            "admin@esf.com",
            UserRole::Admin,
            "admin",
            "Gestor da Escola de Sabedoria Finanças.",
        ),
        user(
            "mentor-1",
            "Professor Silas",
            "mentor@esf.com",
            UserRole::Mentor,
            "mentor",
            "Mentor sênior especialista em mordomia cristã.",
        ),
        user(
            "user-1",
            "Tiago Aprendiz",
            "aluno@esf.com",
            UserRole::Student,
            "student",
            "Buscando sabedoria para gerir meus primeiros frutos.",
        ),
    ]
}

fn exercises(items: [(&str, &str); 3]) -> Vec<Exercise> {
    items
        .into_iter()
        .map(|(scenario, instructions)| Exercise {
            scenario: scenario.into(),
            instructions: instructions.into(),
        })
        .collect()
}

fn quiz(prompt: &str, options: [&str; 4], correct_index: usize, explanation: &str) -> Vec<QuizQuestion> {
    (0..QUESTIONS_PER_LESSON)
        .map(|i| QuizQuestion {
            question: format!("Questão {}: {prompt}", i + 1),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
            explanation: explanation.into(),
        })
        .collect()
}

pub fn lessons() -> Vec<Lesson> {
    let now = now_ms();
    vec![
        Lesson {
            id: "lesson-1".into(),
            user_id: "admin-1".into(),
            title: "Mentalidade de Riqueza".into(),
            summary: "A verdadeira riqueza começa na mente e no espírito. Nesta aula, exploramos como a mordomia cristã transforma nossa visão sobre o dinheiro, saindo da escassez para a abundância com propósito.".into(),
            exercises: exercises([
                ("Identificando Crenças", "Escreva 3 frases que você ouviu sobre dinheiro na infância e como elas afetam sua visão hoje."),
                ("Gratidão Ativa", "Liste 5 coisas não materiais pelas quais você é grato e como o dinheiro poderia potencializar sua ajuda a outros nessas áreas."),
                ("Propósito Financeiro", "Se você ganhasse 1 milhão hoje, qual seria a primeira causa social ou espiritual que você apoiaria e por quê?"),
            ]),
            tests: quiz(
                "O que define um bom mordomo financeiro?",
                ["Acumular sem limites", "Gastar com prazer imediato", "Gerir recursos para a glória de Deus", "Esconder o talento no chão"],
                2,
                "A mordomia cristã foca na gestão responsável dos recursos que nos foram confiados.",
            ),
            article: "# Rompendo as Correntes da Mente\n\nNossas ações são frutos de nossas convicções. Se você acredita que o dinheiro é a raiz de todo mal (interpretando mal a bíblia, que diz que o AMOR ao dinheiro é a raiz), você sabotará seu sucesso.\n\nPrecisamos entender que o dinheiro é uma ferramenta neutra que amplia quem nós já somos. Ser rico para ser generoso é um chamado bíblico de provisão.".into(),
            sources: vec![],
            timestamp: now.saturating_sub(10_000_000),
        },
        Lesson {
            id: "lesson-2".into(),
            user_id: "admin-1".into(),
            title: "O Poder dos Juros Compostos".into(),
            summary: "Entenda como o tempo é o seu maior aliado na construção de patrimônio. Juros compostos são a oitava maravilha do mundo: quem entende, ganha; quem não entende, paga.".into(),
            exercises: exercises([
                ("Cálculo de Longo Prazo", "Se você poupar 50 reais por mês a uma taxa de 1% ao mês, quanto terá em 10 anos? Descreva o impacto do tempo."),
                ("Paciência vs Imediatismo", "Dê um exemplo de algo que você quis comprar por impulso e como o valor desse item investido hoje renderia em 5 anos."),
                ("Investimento em Si Mesmo", "Qual habilidade você pode aprender hoje que aumentará seu valor de mercado no futuro?"),
            ]),
            tests: quiz(
                "Qual o fator mais importante nos juros compostos?",
                ["O valor inicial", "A cor da nota", "O tempo de exposição", "A sorte"],
                2,
                "O tempo é a variável exponencial na fórmula dos juros compostos.",
            ),
            article: "# A Mágica do Tempo\n\nOs juros compostos trabalham enquanto você dorme. Começar cedo, mesmo com pouco, é melhor do que começar tarde com muito. A disciplina supera o talento quando o assunto é acumulação de longo prazo.".into(),
            sources: vec![],
            timestamp: now.saturating_sub(5_000_000),
        },
    ]
}

pub fn posts() -> Vec<Post> {
    let now = now_ms();
    vec![Post {
        id: "p1".into(),
        user_id: "admin-1".into(),
        user_name: "Admin ESF".into(),
        user_avatar: "https://picsum.photos/seed/admin/200".into(),
        content_type: ContentType::Article,
        content: PostContent::Single(
            "A regra dos 50-30-20 é essencial para quem está começando. 50% para necessidades, 30% para desejos e 20% para poupar.".into(),
        ),
        thumbnail: None,
        title: Some("Como dividir sua mesada".into()),
        description: "Dica de ouro para quem quer ter dinheiro sempre!".into(),
        source_url: Some("https://escoladesabedoria.org/regra-50-30-20".into()),
        likes: vec!["user-1".into()],
        comments: vec![Comment {
            id: "c1".into(),
            user_id: "user-1".into(),
            user_name: "Tiago Aprendiz".into(),
            text: "Valeu pela dica! Começo hoje.".into(),
            timestamp: now,
        }],
        views: 154,
        timestamp: now.saturating_sub(3_600_000),
    }]
}
