//! Outbound message texts

use crate::state_machine::{FormVariant, PaymentDetails};

/// Greeting used when the contact has no display name
pub const DEFAULT_NAME: &str = "amigo";

const BACK_TO_MENU: &str = "Digite *Menu* para voltar ao menu principal.";

pub fn menu(name: &str) -> String {
    format!(
        "Olá {name}! 👋 Seja bem-vindo.

Escolha uma opção:

1️⃣ Depositantes + montante
2️⃣ Tabela de valores
3️⃣ Plataformas que estou fazendo
4️⃣ Falar com um atendente

Digite *sair* a qualquer momento para encerrar."
    )
}

/// Text sent when the contact picks one of the form-collecting options
pub fn option(variant: FormVariant) -> String {
    let body = match variant {
        FormVariant::Deposit => DEPOSIT_FORM,
        FormVariant::PriceTable => PRICE_TABLE,
        FormVariant::Platforms => PLATFORMS,
    };
    format!("{body}\n\n{BACK_TO_MENU}")
}

const DEPOSIT_FORM: &str = "📝 *FORMULÁRIO DE DEPÓSITO*

┌─────────────────────────────────
│  Preencha todos os campos:
├─────────────────────────────────
│ 💼 CPALEXANDRE:
│ 🔗 LINK:
│ 👥 DEPOSITANTES:
│ 🎯 META:
│ 📊 MÉDIA:
│ 💵 MONTANTE:
│ 💸 VALOR ENVIADO:
│ ⏰ PRAZO:
└─────────────────────────────────

*Exemplo:*
_CPALEXANDRE: seu_codigo_
_LINK: https://link...._
_DEPOSITANTES: 10_
_META: 5000_
_MÉDIA: 60_
_MONTANTE: 500_
_VALOR ENVIADO: 125_
_PRAZO: 7 dias_";

const PRICE_TABLE: &str = "📊 *TABELA DE VALORES*

*COMISSÃO POR MÉDIA:*
┌──────────────────────────────
│   MÉDIA       COMISSÃO
├──────────────────────────────
│   40+        R$ 8,00/pessoa
│   50+        R$ 9,00/pessoa
│   60+        R$ 9,50/pessoa
└──────────────────────────────

*COMISSÃO POR MONTANTE:*
┌───────────────────────────────
│   MONTANTE      COMISSÃO
├───────────────────────────────
│  R$ 300        R$ 75,00
│  R$ 400        R$ 100,00
│  R$ 500        R$ 125,00
│  R$ 600        R$ 150,00
│  R$ 700        R$ 175,00
│  R$ 800        R$ 200,00
│  R$ 900        R$ 225,00
│ R$ 1.000       R$ 250,00
└───────────────────────────────";

const PLATFORMS: &str = "🚀 *PLATAFORMAS DISPONÍVEIS*

┌────────────────────────────────
│   LISTA DE PLATAFORMAS
├────────────────────────────────
│ 1️⃣  MANGA
│ 2️⃣  BJP
│ 3️⃣  KF
│ 4️⃣  GO
│ 5️⃣  COROA
│ 6️⃣  M8, M9, AM, AA, V5
│ 7️⃣  BC, BY
│ 8️⃣  OKOK, WP, XW, ANJO, 777
│ 9️⃣  888, 777CLUBE, 5555
│ 🔟 BRA, GAME
│ ➕ MAIS PLATAFORMAS EM BREVE!
└────────────────────────────────";

pub fn attendant_handoff() -> String {
    "👨‍💼 Um de nossos atendentes entrará em contato com você em breve. Obrigado!".to_string()
}

pub fn incomplete_form() -> String {
    format!(
        "⚠️ Formulário incompleto. Por favor, envie todos os dados solicitados:

CPALEXANDRE:
LINK 🔗:
DEPOSITANTES:
META:
MÉDIA:
MONTANTE:
VALOR ENVIADO:
PRAZO:

{BACK_TO_MENU}"
    )
}

pub fn form_received_await_payment() -> String {
    "✅ Dados recebidos! Agora, para prosseguir com o pagamento, siga as instruções abaixo."
        .to_string()
}

pub fn payment_instructions(details: &PaymentDetails) -> String {
    format!(
        "📌 PIX para pagamento:

PIX: {}
Nome: {}
Empresa: {}

Por favor, após realizar o pagamento envie o comprovante neste chat.",
        details.pix_key, details.holder, details.institution
    )
}

pub fn form_received_handoff() -> String {
    "✅ Dados recebidos! Nossa equipe vai analisar e entrará em contato com você em breve."
        .to_string()
}

pub fn payment_pending_confirmation() -> String {
    "Em breve um de nossos atendentes vai confirmar seu pagamento!".to_string()
}

pub fn closed() -> String {
    "Fluxo encerrado. Digite *oi* para começar novamente.".to_string()
}

pub fn fallback() -> String {
    "Digite *oi* para iniciar o atendimento.".to_string()
}

pub fn apology() -> String {
    "⚠️ Ocorreu um erro. Tente novamente em instantes.".to_string()
}
