use serde::{Deserialize, Serialize};

use crate::error::PixError;
use crate::utils::money::{reais, Amount};

/// Cart line item as sent to the orders endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco", with = "reais")]
    pub unit_price: Amount,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> Option<Amount> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Σ preço × quantidade, com checagem de overflow.
pub fn cart_total(items: &[OrderItem]) -> Result<Amount, PixError> {
    items.iter().try_fold(Amount::ZERO, |total, item| {
        item.line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or(PixError::AmountOverflow)
    })
}

// Payload enviado para /pedidos depois do pagamento
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    #[serde(rename = "empresa_id")]
    pub company_id: u64,
    pub session_id: Option<String>,
    #[serde(rename = "nome_cliente")]
    pub customer_name: String,
    #[serde(rename = "contato_cliente")]
    pub customer_contact: String,
    #[serde(rename = "valor_total", with = "reais")]
    pub total: Amount,
    #[serde(rename = "itens")]
    pub items: Vec<OrderItem>,
}

impl OrderSubmission {
    pub fn new(
        company_id: u64,
        session_id: Option<String>,
        customer_name: &str,
        customer_contact: &str,
        items: Vec<OrderItem>,
    ) -> Result<Self, PixError> {
        let customer_name = customer_name.trim();
        let customer_contact = customer_contact.trim();
        if customer_name.is_empty() || customer_contact.is_empty() {
            return Err(PixError::InvalidOrder(
                "customer name and contact are both required".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(PixError::EmptyCart);
        }

        let total = cart_total(&items)?;
        Ok(Self {
            company_id,
            session_id,
            customer_name: customer_name.to_string(),
            customer_contact: customer_contact.to_string(),
            total,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, cents: u64, quantity: u32) -> OrderItem {
        OrderItem {
            id,
            name: format!("item {id}"),
            unit_price: Amount::from_cents(cents).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_cart_total() {
        let items = vec![item(1, 1250, 2), item(2, 500, 1)];
        assert_eq!(cart_total(&items).unwrap().cents(), 3000);
        assert_eq!(cart_total(&[]).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_cart_total_overflow() {
        let items = vec![item(1, 999_999_999_999, 1), item(2, 1, 1)];
        assert_eq!(cart_total(&items), Err(PixError::AmountOverflow));
        assert_eq!(cart_total(&[item(1, 999_999_999_999, 2)]), Err(PixError::AmountOverflow));
    }

    #[test]
    fn test_submission_requires_customer_and_items() {
        assert!(matches!(
            OrderSubmission::new(1, None, "", "11999998888", vec![item(1, 100, 1)]),
            Err(PixError::InvalidOrder(_))
        ));
        assert_eq!(
            OrderSubmission::new(1, None, "Maria", "11999998888", vec![]),
            Err(PixError::EmptyCart)
        );
    }

    #[test]
    fn test_submission_serializes_api_field_names() {
        let submission = OrderSubmission::new(
            1,
            Some("sess-42".to_string()),
            " Maria ",
            "11999998888",
            vec![item(7, 1990, 2)],
        )
        .unwrap();

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["empresa_id"], 1);
        assert_eq!(json["session_id"], "sess-42");
        assert_eq!(json["nome_cliente"], "Maria");
        assert_eq!(json["valor_total"], 39.8);
        assert_eq!(json["itens"][0]["nome"], "item 7");
        assert_eq!(json["itens"][0]["preco"], 19.9);
        assert_eq!(json["itens"][0]["quantity"], 2);
    }

    #[test]
    fn test_item_from_api_uses_reais() {
        let item: OrderItem =
            serde_json::from_str(r#"{"id":1,"nome":"X-Burger","preco":19.9,"quantity":2}"#).unwrap();
        assert_eq!(item.unit_price.cents(), 1990);
        assert_eq!(item.line_total().unwrap().cents(), 3980);

        let back: OrderItem = serde_json::from_value(serde_json::to_value(&item).unwrap()).unwrap();
        assert_eq!(back, item);
    }
}
